//! Batched resolution of text reference ids into display strings.
//!
//! A list of N entities with K text fields costs at most K store lookups,
//! never N x K. Each lookup asks for the requested language and the fallback
//! language at once; the requested language wins when both exist.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ports::LocalizedTextRepository;
use crate::domain::{ContentEntity, LanguageCode, Localized, LocalizedText, ReferenceId};

/// Resolves the text fields of content entities for one language.
#[derive(Clone)]
pub struct TranslationResolver {
    texts: Arc<dyn LocalizedTextRepository>,
    fallback: LanguageCode,
}

/// Rows of one lookup, indexed by reference then language.
struct TextTable(HashMap<ReferenceId, HashMap<LanguageCode, String>>);

impl TextTable {
    fn from_rows(rows: Vec<LocalizedText>) -> Self {
        let mut table: HashMap<ReferenceId, HashMap<LanguageCode, String>> = HashMap::new();
        for row in rows {
            table
                .entry(row.reference_id)
                .or_default()
                .insert(row.language_code, row.text_content);
        }
        Self(table)
    }

    /// First available text following `languages` in priority order.
    fn pick(&self, reference: ReferenceId, languages: &[LanguageCode]) -> Option<&str> {
        let variants = self.0.get(&reference)?;
        languages
            .iter()
            .find_map(|language| variants.get(language))
            .map(String::as_str)
    }
}

impl TranslationResolver {
    /// Resolver reading from `texts`, falling back to `fallback` when the
    /// requested language has no variant. Servers pass the source language.
    pub fn new(texts: Arc<dyn LocalizedTextRepository>, fallback: LanguageCode) -> Self {
        Self { texts, fallback }
    }

    fn languages_for(&self, requested: &LanguageCode) -> Vec<LanguageCode> {
        if *requested == self.fallback {
            vec![requested.clone()]
        } else {
            vec![requested.clone(), self.fallback.clone()]
        }
    }

    /// Resolve a single entity.
    pub async fn resolve_one<T: ContentEntity>(
        &self,
        entity: T,
        language: &LanguageCode,
    ) -> Localized<T> {
        let mut items = [Localized::unresolved(entity)];
        self.resolve_in_place(&mut items, language).await;
        let [resolved] = items;
        resolved
    }

    /// Resolve a batch with one store lookup per text field.
    ///
    /// Order is preserved. Fields whose lookup fails, or whose reference has
    /// no text in either language, are left unresolved.
    pub async fn resolve_many<T: ContentEntity>(
        &self,
        entities: Vec<T>,
        language: &LanguageCode,
    ) -> Vec<Localized<T>> {
        let mut items: Vec<Localized<T>> = entities.into_iter().map(Localized::unresolved).collect();
        self.resolve_in_place(&mut items, language).await;
        items
    }

    async fn resolve_in_place<T: ContentEntity>(
        &self,
        items: &mut [Localized<T>],
        language: &LanguageCode,
    ) {
        if items.is_empty() {
            return;
        }
        let languages = self.languages_for(language);

        for &field in T::TEXT_FIELDS {
            let references: Vec<ReferenceId> = items
                .iter()
                .filter_map(|item| item.entity.text_ref(field))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            if references.is_empty() {
                continue;
            }

            let rows = match self.texts.find_by_references(&references, &languages).await {
                Ok(rows) => rows,
                Err(error) => {
                    warn!(
                        kind = %T::KIND,
                        field,
                        %error,
                        "text lookup failed, leaving field unresolved"
                    );
                    continue;
                }
            };

            let table = TextTable::from_rows(rows);
            for item in items.iter_mut() {
                let Some(reference) = item.entity.text_ref(field) else {
                    continue;
                };
                if let Some(text) = table.pick(reference, &languages) {
                    item.texts.insert(field, text.to_owned());
                }
            }
        }

        debug!(
            kind = %T::KIND,
            items = items.len(),
            language = %language,
            "resolved text fields"
        );
    }
}
