//Copyright 2024 Felix Engl
//
//Licensed under the Apache License, Version 2.0 (the "License");
//you may not use this file except in compliance with the License.
//You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
//Unless required by applicable law or agreed to in writing, software
//distributed under the License is distributed on an "AS IS" BASIS,
//WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//See the License for the specific language governing permissions and
//limitations under the License.

pub mod cleaner;
pub mod configs;
pub mod error;
pub mod lemma;
pub mod stopwords;
pub mod table;

pub use cleaner::TextCleaner;
pub use configs::CleanerConfig;
pub use error::TextCleaningError;
pub use stopwords::StopWordList;
pub use table::{Table, Value};
