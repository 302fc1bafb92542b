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

use std::fmt::{Debug, Formatter};

use itertools::Itertools;
use regex::Regex;
use rust_stemmers::Stemmer;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::configs::CleanerConfig;
use crate::error::TextCleaningError;
use crate::lemma::{IdentityLemmatizer, Lemmatize};
use crate::stopwords::StopWordList;
use crate::table::{Table, Value};

/// Anything that is neither a word character nor whitespace.
const NON_WORD_PATTERN: &str = r"[^\w\s]";

/// Normalizes tabular text ahead of downstream NLP tasks.
///
/// The cleaner owns its stemmer, lemmatizer and stop word list.
/// The stop word list is loaded once on creation, a refresh has to be
/// requested explicitly with [`Self::reload_stop_words`].
pub struct TextCleaner {
    config: CleanerConfig,
    stemmer: Option<Stemmer>,
    lemmatizer: Box<dyn Lemmatize + Send + Sync>,
    stop_words: StopWordList,
    word_filter: Regex,
}

impl Debug for TextCleaner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextCleaner")
            .field("config", &self.config)
            .field("lemmatizer", &self.lemmatizer)
            .field("stop_words", &self.stop_words.len())
            .finish()
    }
}

impl TextCleaner {
    pub fn new(config: CleanerConfig) -> Result<Self, TextCleaningError> {
        let stop_words = match &config.stop_words {
            Some(path) => StopWordList::load_from_file(path)?,
            None => StopWordList::default(),
        };
        let stemmer = config.stemmer.map(Stemmer::create);
        let word_filter = Regex::new(NON_WORD_PATTERN)?;
        log::debug!(
            "Created a text cleaner for {} with {} stop words",
            config.language.to_name(),
            stop_words.len()
        );
        Ok(Self {
            config,
            stemmer,
            lemmatizer: Box::new(IdentityLemmatizer),
            stop_words,
            word_filter,
        })
    }

    /// Replaces the default lemmatizer.
    pub fn with_lemmatizer<L>(mut self, lemmatizer: L) -> Self
    where
        L: Lemmatize + Send + Sync + 'static,
    {
        self.lemmatizer = Box::new(lemmatizer);
        self
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    pub fn stop_words(&self) -> &StopWordList {
        &self.stop_words
    }

    /// Rereads the configured stop word file into the cached list.
    /// Does nothing when no file is configured.
    pub fn reload_stop_words(&mut self) -> Result<(), TextCleaningError> {
        if let Some(path) = &self.config.stop_words {
            self.stop_words = StopWordList::load_from_file(path)?;
            log::debug!("Reloaded {} stop words from {}", self.stop_words.len(), path);
        }
        Ok(())
    }

    /// Reduces a text to its closest ASCII form.
    ///
    /// Decomposes the text (NFKD), drops every character without an ASCII
    /// representation, capitalizes it, trims the surrounding whitespace and
    /// deletes all remaining punctuation. Empty texts stay empty.
    pub fn normalize_text(&self, text: &str) -> String {
        let ascii = text
            .nfkd()
            .filter(char::is_ascii)
            .collect::<String>();
        let capitalized = capitalize(&ascii);
        self.word_filter
            .replace_all(capitalized.trim(), "")
            .into_owned()
    }

    /// Applies [`Self::normalize_text`] to every textual cell.
    /// Length and order of the column stay untouched.
    pub fn normalize_column(&self, column: &[Value]) -> Vec<Value> {
        column
            .iter()
            .map(|value| match value {
                Value::Text(text) => Value::Text(self.normalize_text(text)),
                other => other.clone(),
            })
            .collect()
    }

    /// Cleans a table for text analysis.
    ///
    /// Coerces the `columns_to_clean` to text, drops every row where
    /// `required_column` is missing, then normalizes and lowercases the
    /// coerced columns. Surviving rows keep their relative order.
    pub fn clean_table(
        &self,
        mut table: Table,
        columns_to_clean: &[&str],
        required_column: &str,
    ) -> Result<Table, TextCleaningError> {
        log::info!(
            "Cleaning {} columns of a table with {} rows",
            columns_to_clean.len(),
            table.row_count()
        );

        for name in columns_to_clean {
            let coerced = self
                .required_column(&table, name)?
                .iter()
                .map(|value| match value {
                    Value::Missing => Value::Missing,
                    other => Value::Text(other.to_text()),
                })
                .collect_vec();
            table.replace_column(name, coerced)?;
        }

        let keep = self
            .required_column(&table, required_column)?
            .iter()
            .map(|value| !value.is_missing())
            .collect_vec();
        let dropped = keep.iter().filter(|marked| !**marked).count();
        if dropped > 0 {
            log::debug!(
                "Dropping {dropped} rows with a missing {required_column:?} entry"
            );
        }
        table.retain_rows(&keep);

        for name in columns_to_clean {
            let cleaned = self
                .normalize_column(self.required_column(&table, name)?)
                .into_iter()
                .map(|value| match value {
                    Value::Text(text) => Value::Text(text.to_lowercase()),
                    other => other,
                })
                .collect_vec();
            table.replace_column(name, cleaned)?;
        }

        Ok(table)
    }

    /// Stems a sentence with the threshold from the config.
    pub fn stem_sentence(&self, sentence: &str) -> String {
        self.stem_sentence_with(sentence, self.config.min_token_length)
    }

    /// Stems a single sentence.
    ///
    /// Every token with more than `min_len` characters is lemmatized as a
    /// verb, stemmed and appended together with a trailing space. Shorter
    /// tokens are dropped. A sentence of only short tokens therefore stems
    /// to the empty string.
    pub fn stem_sentence_with(&self, sentence: &str, min_len: usize) -> String {
        let mut stemmed = String::new();
        for word in sentence.unicode_words() {
            if word.chars().count() > min_len {
                let lemma = self.lemmatizer.lemma(word);
                match &self.stemmer {
                    Some(stemmer) => stemmed.push_str(stemmer.stem(lemma.as_ref()).as_ref()),
                    None => stemmed.push_str(lemma.as_ref()),
                }
                stemmed.push(' ');
            }
        }
        stemmed
    }

    /// Drops all stop words from a sentence.
    /// The remaining tokens are rejoined with single spaces.
    pub fn remove_stop_words(&self, sentence: &str) -> String {
        sentence
            .unicode_words()
            .filter(|word| !self.stop_words.contains(word))
            .join(" ")
    }

    /// Applies [`Self::remove_stop_words`] to every textual cell of the
    /// named column if `enabled` is set, otherwise the table passes through
    /// unchanged. The column has to exist either way.
    pub fn remove_stop_words_in_column(
        &self,
        mut table: Table,
        column: &str,
        enabled: bool,
    ) -> Result<Table, TextCleaningError> {
        if !enabled {
            self.required_column(&table, column)?;
            return Ok(table);
        }
        log::info!("Removing stop words from the column {column:?}");
        let filtered = self
            .required_column(&table, column)?
            .iter()
            .map(|value| match value {
                Value::Text(text) => Value::Text(self.remove_stop_words(text)),
                other => other.clone(),
            })
            .collect_vec();
        table.replace_column(column, filtered)?;
        Ok(table)
    }

    fn required_column<'a>(
        &self,
        table: &'a Table,
        name: &str,
    ) -> Result<&'a [Value], TextCleaningError> {
        table
            .column(name)
            .ok_or_else(|| TextCleaningError::ColumnNotFound(name.to_string()))
    }
}

/// Uppercases the first character and lowercases the rest.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod test {
    use std::borrow::Cow;
    use std::io::Write;

    use camino_tempfile::Utf8TempDir;

    use crate::configs::CleanerConfig;
    use crate::error::TextCleaningError;
    use crate::lemma::Lemmatize;
    use crate::table::{Table, Value};
    use crate::TextCleaner;

    fn cleaner() -> TextCleaner {
        TextCleaner::new(CleanerConfig::default()).unwrap()
    }

    fn cleaner_with_stop_words(words: &str) -> (Utf8TempDir, TextCleaner) {
        let dir = camino_tempfile::tempdir().unwrap();
        let path = dir.path().join("stop_words.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{words}").unwrap();
        drop(file);
        let cleaner = TextCleaner::new(CleanerConfig {
            stop_words: Some(path),
            ..CleanerConfig::default()
        })
        .unwrap();
        (dir, cleaner)
    }

    #[test]
    fn normalized_text_is_ascii() {
        let cleaner = cleaner();
        for text in ["ñandú", "pingüino", "ÁRBOLES", "über straße", "日本語 y más"] {
            let normalized = cleaner.normalize_text(text);
            assert!(
                normalized.is_ascii(),
                "{text:?} normalized to the non ascii {normalized:?}"
            );
        }
    }

    #[test]
    fn normalization_strips_accents_and_punctuation() {
        let cleaner = cleaner();
        // The leading space is still there when the text is capitalized,
        // so the first letter ends up lowercased like everything else.
        assert_eq!("el nandu corre", cleaner.normalize_text(" ¡El Ñandú corre! "));
        assert_eq!("Cancion numero 3", cleaner.normalize_text("canción, número 3"));
        assert_eq!("", cleaner.normalize_text(""));
    }

    #[test]
    fn normalization_is_idempotent() {
        let cleaner = cleaner();
        for text in ["¿Qué tal?", "HOLA MUNDO", "¡Ñoño!", ""] {
            let once = cleaner.normalize_text(text);
            assert_eq!(once, cleaner.normalize_text(&once));
        }
    }

    #[test]
    fn clean_table_drops_exactly_the_missing_rows() {
        let cleaner = cleaner();
        let table = Table::from_columns([
            (
                "label",
                vec![
                    Value::from("uno"),
                    Value::Missing,
                    Value::from("tres"),
                    Value::Missing,
                ],
            ),
            (
                "text",
                vec![
                    Value::from("El Árbol"),
                    Value::from("¡Hola!"),
                    Value::from("Canción"),
                    Value::from("Adiós"),
                ],
            ),
        ])
        .unwrap();

        let cleaned = cleaner.clean_table(table, &["text"], "label").unwrap();
        assert_eq!(2, cleaned.row_count());
        assert_eq!(
            Some(&[Value::from("uno"), Value::from("tres")][..]),
            cleaned.column("label")
        );
        assert_eq!(
            Some(&[Value::from("el arbol"), Value::from("cancion")][..]),
            cleaned.column("text")
        );
    }

    #[test]
    fn clean_table_coerces_scalars() {
        let cleaner = cleaner();
        let table = Table::from_columns([
            ("id", vec![Value::from("a"), Value::from("b")]),
            ("text", vec![Value::Int(42), Value::Bool(true)]),
        ])
        .unwrap();
        let cleaned = cleaner.clean_table(table, &["text"], "id").unwrap();
        assert_eq!(
            Some(&[Value::from("42"), Value::from("true")][..]),
            cleaned.column("text")
        );
    }

    #[test]
    fn clean_table_reports_unknown_columns() {
        let cleaner = cleaner();
        let table = Table::from_columns([("text", vec![Value::from("hola")])]).unwrap();
        assert!(matches!(
            cleaner.clean_table(table.clone(), &["nope"], "text"),
            Err(TextCleaningError::ColumnNotFound(name)) if name == "nope"
        ));
        assert!(matches!(
            cleaner.clean_table(table, &["text"], "nope"),
            Err(TextCleaningError::ColumnNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn stems_long_tokens_with_trailing_spaces() {
        let cleaner = cleaner();
        assert_eq!("corr salt ", cleaner.stem_sentence("corriendo saltando"));
    }

    #[test]
    fn short_tokens_are_dropped() {
        let cleaner = cleaner();
        // Every token has at most four characters.
        assert_eq!("", cleaner.stem_sentence("el un dos tres gato"));
        assert_eq!("", cleaner.stem_sentence(""));
    }

    #[test]
    fn threshold_is_strict() {
        let cleaner = cleaner();
        // "gatos" has five characters and barely passes the default of four.
        assert_eq!("gat ", cleaner.stem_sentence("gato gatos"));
        assert_eq!("gat gat ", cleaner.stem_sentence_with("gato gatos", 3));
    }

    #[derive(Debug)]
    struct GerundLemmatizer;

    impl Lemmatize for GerundLemmatizer {
        fn lemma<'a>(&self, word: &'a str) -> Cow<'a, str> {
            match word.strip_suffix("iendo") {
                Some(stem) => Cow::Owned(format!("{stem}er")),
                None => Cow::Borrowed(word),
            }
        }
    }

    #[test]
    fn custom_lemmatizer_runs_before_the_stemmer() {
        let cleaner = cleaner().with_lemmatizer(GerundLemmatizer);
        // "corriendo" lemmatizes to "correr" which stems to "corr" as well.
        assert_eq!("corr ", cleaner.stem_sentence("corriendo"));
    }

    #[test]
    fn removes_stop_words_from_a_sentence() {
        let (_dir, cleaner) = cleaner_with_stop_words("el\nla\nlos\n");
        assert_eq!(
            "gato come pescado",
            cleaner.remove_stop_words("el gato come pescado")
        );
        // Case sensitive, exactly as read from the file.
        assert_eq!("El gato", cleaner.remove_stop_words("El el gato"));
    }

    #[test]
    fn stop_word_removal_over_a_column_respects_the_flag() {
        let (_dir, cleaner) = cleaner_with_stop_words("el\n");
        let table = Table::from_columns([(
            "text",
            vec![Value::from("el gato"), Value::Missing, Value::from("el perro")],
        )])
        .unwrap();

        let untouched = cleaner
            .remove_stop_words_in_column(table.clone(), "text", false)
            .unwrap();
        assert_eq!(table, untouched);

        let filtered = cleaner
            .remove_stop_words_in_column(table.clone(), "text", true)
            .unwrap();
        assert_eq!(
            Some(&[Value::from("gato"), Value::Missing, Value::from("perro")][..]),
            filtered.column("text")
        );

        assert!(matches!(
            cleaner.remove_stop_words_in_column(table, "nope", false),
            Err(TextCleaningError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn missing_stop_word_file_fails_creation() {
        let dir = camino_tempfile::tempdir().unwrap();
        let result = TextCleaner::new(CleanerConfig {
            stop_words: Some(dir.path().join("nope.txt")),
            ..CleanerConfig::default()
        });
        assert!(matches!(result, Err(TextCleaningError::IO(_))));
    }

    #[test]
    fn reload_picks_up_changes() {
        let (dir, mut cleaner) = cleaner_with_stop_words("el\n");
        assert_eq!(1, cleaner.stop_words().len());

        let mut file = std::fs::File::create(dir.path().join("stop_words.txt")).unwrap();
        write!(file, "el\nla\n").unwrap();
        drop(file);

        cleaner.reload_stop_words().unwrap();
        assert_eq!(2, cleaner.stop_words().len());
        assert!(cleaner.stop_words().contains("la"));
    }
}
