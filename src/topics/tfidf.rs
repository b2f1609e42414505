// Batch-local TF-IDF: fallback embedder and class-based topic naming.
//
// When the sentence model isn't downloaded, incidents are embedded as
// L2-normalised TF-IDF vectors over the batch vocabulary. Cosine similarity
// between those still groups reports that share distinctive terms.
//
// Topic names use class-based TF-IDF (c-TF-IDF): all texts in a topic are
// treated as one document, and terms frequent in that topic but rare across
// the others score highest. Names follow "<id>_<kw1>_<kw2>_<kw3>_<kw4>".

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use anyhow::Result;
use async_trait::async_trait;
use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

use super::traits::TextEmbedder;

/// Keywords joined into a topic name.
pub const NAME_KEYWORDS: usize = 4;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("word pattern is a valid regex"));

static STOP_WORDS: LazyLock<HashSet<String>> = LazyLock::new(|| {
    let words: Vec<String> = get(LANGUAGE::English);
    words.into_iter().collect()
});

/// Lowercased word tokens with stop words, single characters and bare
/// numbers removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| w.len() > 1)
        .filter(|w| !w.bytes().all(|b| b.is_ascii_digit()))
        .filter(|w| !STOP_WORDS.contains(*w))
        .map(str::to_string)
        .collect()
}

/// Embedder fallback: TF-IDF vectors over the batch's own vocabulary.
pub struct TfIdfEmbedder;

#[async_trait]
impl TextEmbedder for TfIdfEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        Ok(tfidf_vectors(texts))
    }

    fn name(&self) -> &'static str {
        "tfidf"
    }
}

/// L2-normalised TF-IDF vectors, one per text, with smoothed IDF
/// `ln((1 + n) / (1 + df)) + 1`. Texts without terms get a zero vector.
pub fn tfidf_vectors(texts: &[String]) -> Vec<Vec<f64>> {
    let docs: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t)).collect();

    // BTreeMap keeps vocabulary indices deterministic
    let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in &docs {
        let unique: HashSet<&str> = doc.iter().map(|w| w.as_str()).collect();
        for word in unique {
            *doc_freq.entry(word).or_insert(0) += 1;
        }
    }

    let index: HashMap<&str, usize> = doc_freq
        .keys()
        .enumerate()
        .map(|(i, w)| (*w, i))
        .collect();
    let n = docs.len() as f64;
    let idf: Vec<f64> = doc_freq
        .values()
        .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
        .collect();

    docs.iter()
        .map(|doc| {
            let mut vector = vec![0.0; index.len()];
            if doc.is_empty() {
                return vector;
            }
            let len = doc.len() as f64;
            for word in doc {
                if let Some(&i) = index.get(word.as_str()) {
                    vector[i] += 1.0 / len;
                }
            }
            for (value, weight) in vector.iter_mut().zip(&idf) {
                *value *= weight;
            }
            let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for value in &mut vector {
                    *value /= norm;
                }
            }
            vector
        })
        .collect()
}

/// Top `top_n` c-TF-IDF keywords per topic id.
///
/// Score for term `t` in topic `c`: `tf(t, c) * ln(1 + A / f(t))`, where
/// `tf` is the term's share of the topic's tokens, `A` the average token
/// count per topic and `f(t)` the term's count across all topics.
/// Ties are broken alphabetically.
pub fn class_keywords(
    texts: &[String],
    topic_ids: &[i64],
    top_n: usize,
) -> BTreeMap<i64, Vec<String>> {
    let mut class_counts: BTreeMap<i64, HashMap<String, usize>> = BTreeMap::new();
    for (text, &topic) in texts.iter().zip(topic_ids) {
        let counts = class_counts.entry(topic).or_default();
        for word in tokenize(text) {
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut global: HashMap<&str, usize> = HashMap::new();
    for counts in class_counts.values() {
        for (word, &c) in counts {
            *global.entry(word.as_str()).or_insert(0) += c;
        }
    }

    let total_tokens: usize = global.values().sum();
    let avg_tokens = if class_counts.is_empty() {
        0.0
    } else {
        total_tokens as f64 / class_counts.len() as f64
    };

    class_counts
        .iter()
        .map(|(&topic, counts)| {
            let class_total: usize = counts.values().sum();
            let mut scored: Vec<(&str, f64)> = counts
                .iter()
                .map(|(word, &c)| {
                    let tf = c as f64 / class_total as f64;
                    let f_t = global.get(word.as_str()).copied().unwrap_or(1) as f64;
                    (word.as_str(), tf * (1.0 + avg_tokens / f_t).ln())
                })
                .collect();
            scored.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(b.0))
            });
            let keywords = scored
                .into_iter()
                .take(top_n)
                .map(|(w, _)| w.to_string())
                .collect();
            (topic, keywords)
        })
        .collect()
}

/// `"<id>_<kw1>_..._<kw4>"` names for every topic that has keywords.
/// Topics whose texts have no usable terms get no entry.
pub fn topic_names(texts: &[String], topic_ids: &[i64]) -> BTreeMap<i64, String> {
    class_keywords(texts, topic_ids, NAME_KEYWORDS)
        .into_iter()
        .filter(|(_, keywords)| !keywords.is_empty())
        .map(|(topic, keywords)| (topic, format!("{}_{}", topic, keywords.join("_"))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_numbers() {
        let tokens = tokenize("The KYC 5000 a fraud!");
        assert_eq!(tokens, vec!["kyc", "fraud"]);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let vectors = tfidf_vectors(&strings(&["kyc update link", "courier fee link"]));
        for v in &vectors {
            let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_text_gets_zero_vector() {
        let vectors = tfidf_vectors(&strings(&["kyc update", ""]));
        assert!(vectors[1].iter().all(|&v| v == 0.0));
        assert_eq!(vectors[0].len(), vectors[1].len());
    }

    #[test]
    fn test_class_keywords_prefers_distinctive_terms() {
        let texts = strings(&[
            "kyc suspension bank link",
            "kyc suspension verify bank",
            "courier parcel customs bank",
        ]);
        let keywords = class_keywords(&texts, &[0, 0, 1], 2);
        assert_eq!(keywords[&0], vec!["kyc", "suspension"]);
        assert!(!keywords[&1].contains(&"bank".to_string()));
    }

    #[test]
    fn test_topic_names_format() {
        let texts = strings(&["lottery prize winner", "lottery prize jackpot"]);
        let names = topic_names(&texts, &[0, 0]);
        assert!(names[&0].starts_with("0_lottery_prize"));
        assert_eq!(names[&0].split('_').count(), 1 + NAME_KEYWORDS);
    }

    #[test]
    fn test_topic_without_terms_has_no_name() {
        let names = topic_names(&strings(&["the and of", "kyc update"]), &[-1, 0]);
        assert!(!names.contains_key(&-1));
        assert!(names.contains_key(&0));
    }
}
