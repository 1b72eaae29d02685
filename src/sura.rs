//! Verse text lookup for a whole chapter, in the source script or
//! transliterated through a caller-supplied [`Transliterate`].

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::ClientError;
use crate::fetch::ContentFetcher;
use crate::shapes::{RequestShape, ShapeKind};

/// Script conversion applied to each transliterated verse.
pub trait Transliterate: Send + Sync {
    fn transliterate(&self, text: &str) -> String;
}

impl<F> Transliterate for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn transliterate(&self, text: &str) -> String {
        self(text)
    }
}

/// Verses of one chapter, in verse order.
///
/// [`iter`](Self::iter) can be called any number of times; each call walks
/// the verses again and transliterates lazily when a converter is attached.
#[derive(Clone)]
pub struct Verses {
    texts: Vec<String>,
    converter: Option<Arc<dyn Transliterate>>,
}

impl Verses {
    fn new(texts: Vec<String>, converter: Option<Arc<dyn Transliterate>>) -> Self {
        Self { texts, converter }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        self.texts.iter().map(|text| match &self.converter {
            Some(converter) => converter.transliterate(text),
            None => text.clone(),
        })
    }
}

impl std::fmt::Debug for Verses {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verses")
            .field("len", &self.texts.len())
            .field("transliterated", &self.converter.is_some())
            .finish()
    }
}

/// Chapter text accessors over a shared fetcher.
#[derive(Clone)]
pub struct SuraText {
    fetcher: ContentFetcher,
    converter: Arc<dyn Transliterate>,
}

impl SuraText {
    #[must_use]
    pub fn new(fetcher: ContentFetcher, converter: impl Transliterate + 'static) -> Self {
        Self {
            fetcher,
            converter: Arc::new(converter),
        }
    }

    /// Verses of chapter `sura` in the source script.
    ///
    /// `Ok(None)` when the provider returned nothing usable.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] for provider errors and
    /// [`ClientError::MalformedEnvelope`] when the payload has no verse list.
    #[instrument(skip(self))]
    pub async fn source(&self, sura: u32) -> Result<Option<Verses>, ClientError> {
        self.load(ShapeKind::SuraSource, sura, None).await
    }

    /// Verses of chapter `sura`, each passed through the transliterator.
    ///
    /// # Errors
    ///
    /// Same as [`source`](Self::source).
    #[instrument(skip(self))]
    pub async fn transliterated(&self, sura: u32) -> Result<Option<Verses>, ClientError> {
        self.load(
            ShapeKind::SuraTransliterated,
            sura,
            Some(Arc::clone(&self.converter)),
        )
        .await
    }

    async fn load(
        &self,
        kind: ShapeKind,
        sura: u32,
        converter: Option<Arc<dyn Transliterate>>,
    ) -> Result<Option<Verses>, ClientError> {
        let url = RequestShape::sura(kind, sura)?.url(self.fetcher.config())?;
        let Some(payload) = self.fetcher.fetch(&url).await? else {
            debug!(sura, "No sura content returned");
            return Ok(None);
        };
        let texts = verse_texts(&url, &payload)?;
        debug!(sura, verses = texts.len(), "Sura text loaded");
        Ok(Some(Verses::new(texts, converter)))
    }
}

impl std::fmt::Debug for SuraText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuraText")
            .field("fetcher", &self.fetcher)
            .finish_non_exhaustive()
    }
}

/// Extracts `payload[0].ayahs[*].text`.
fn verse_texts(url: &str, payload: &Value) -> Result<Vec<String>, ClientError> {
    let ayahs = payload
        .get(0)
        .and_then(|edition| edition.get("ayahs"))
        .and_then(Value::as_array)
        .ok_or_else(|| ClientError::malformed(url, "payload has no `[0].ayahs` list"))?;

    ayahs
        .iter()
        .enumerate()
        .map(|(index, ayah)| {
            ayah.get("text")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    ClientError::malformed(url, format!("verse {} has no text", index + 1))
                })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_verse_texts_in_order() {
        let payload = json!([{"ayahs": [{"text": "a"}, {"text": "b"}, {"text": "c"}]}]);
        assert_eq!(verse_texts("u", &payload).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_verse_texts_requires_ayahs() {
        let err = verse_texts("u", &json!({"ayahs": []})).unwrap_err();
        assert!(matches!(err, ClientError::MalformedEnvelope { .. }));

        let err = verse_texts("u", &json!([{"ayahs": [{"number": 1}]}])).unwrap_err();
        assert!(err.to_string().contains("verse 1"));
    }

    #[test]
    fn test_verses_are_restartable_and_lazy() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let converter = move |text: &str| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            text.to_uppercase()
        };
        let verses = Verses::new(
            vec!["bir".to_string(), "ikki".to_string()],
            Some(Arc::new(converter)),
        );
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);

        let first: Vec<String> = verses.iter().collect();
        let second: Vec<String> = verses.iter().collect();
        assert_eq!(first, vec!["BIR", "IKKI"]);
        assert_eq!(first, second);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 4);
        assert_eq!(verses.len(), 2);
    }

    #[test]
    fn test_verses_without_converter_yield_source() {
        let verses = Verses::new(vec!["x".to_string()], None);
        assert_eq!(verses.iter().collect::<Vec<_>>(), vec!["x"]);
        assert!(!verses.is_empty());
    }
}
