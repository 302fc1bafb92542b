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

use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader};

use camino::Utf8Path;
use compact_str::{CompactString, ToCompactString};
use serde::{Deserialize, Serialize};

/// A stop word list used as a membership filter.
/// Matching is exact and case sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopWordList {
    words: HashSet<CompactString>,
}

impl StopWordList {
    pub fn new(mut words: HashSet<CompactString>) -> Self {
        words.shrink_to_fit();
        Self { words }
    }

    /// Loads a stop word list from a plain text file with one word per line.
    /// The line terminator is stripped, blank lines are skipped.
    pub fn load_from_file(path: impl AsRef<Utf8Path>) -> Result<Self, io::Error> {
        let path = path.as_ref();
        let lines = BufReader::new(File::open(path)?)
            .lines()
            .collect::<Result<Vec<_>, _>>()?;
        let words: HashSet<_> = lines
            .into_iter()
            .filter(|line| !line.is_empty())
            .map(CompactString::from)
            .collect();
        log::debug!("Loaded {} stop words from {}", words.len(), path);
        Ok(Self::new(words))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<Q> FromIterator<Q> for StopWordList
where
    Q: ToCompactString,
{
    fn from_iter<T: IntoIterator<Item = Q>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|value| value.to_compact_string())
                .collect(),
        )
    }
}

impl<Q> Extend<Q> for StopWordList
where
    Q: ToCompactString,
{
    fn extend<T: IntoIterator<Item = Q>>(&mut self, iter: T) {
        self.words
            .extend(iter.into_iter().map(|value| value.to_compact_string()));
        self.words.shrink_to_fit();
    }
}
