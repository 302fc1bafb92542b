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

use camino::Utf8PathBuf;
use isolang::Language;
use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};

/// Tokens with at most this many characters are dropped while stemming.
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 4;

/// The config for a [`crate::TextCleaner`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// The language of the texts to clean.
    pub language: Language,
    /// The stemming algorithm applied after lemmatization.
    /// If unset the tokens are only lemmatized.
    pub stemmer: Option<Algorithm>,
    /// Tokens with a character count of at most this value are dropped
    /// when stemming a sentence.
    pub min_token_length: usize,
    /// A plain text file with one stop word per line.
    /// Loaded once when the cleaner is created.
    pub stop_words: Option<Utf8PathBuf>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            language: Language::Spa,
            stemmer: Some(Algorithm::Spanish),
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            stop_words: None,
        }
    }
}
