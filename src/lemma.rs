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

use std::borrow::Cow;
use std::fmt::Debug;

/// Maps a single word to its lemma, read as a verb.
pub trait Lemmatize: Debug {
    fn lemma<'a>(&self, word: &'a str) -> Cow<'a, str>;
}

/// A lemmatizer returning every word unchanged.
/// Used when no morphological dictionary is available for the target language.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityLemmatizer;

impl Lemmatize for IdentityLemmatizer {
    fn lemma<'a>(&self, word: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(word)
    }
}

#[cfg(test)]
mod test {
    use super::{IdentityLemmatizer, Lemmatize};

    #[test]
    fn identity_borrows_the_input() {
        let lemma = IdentityLemmatizer.lemma("corriendo");
        assert_eq!("corriendo", lemma);
        assert!(matches!(lemma, std::borrow::Cow::Borrowed(_)));
    }
}
