// ABOUTME: Name and calorie similarity measures used to score reference food candidates
// ABOUTME: Tokenized Jaccard index with qualifier stop-words and linear relative-error calorie score
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 The nutriadapt Authors

use std::collections::BTreeSet;

/// Lower-case word tokens of a food name with qualifier words removed
///
/// Splits on whitespace and punctuation and folds simple plurals. When removing
/// stop-words would leave nothing, the unfiltered tokens are returned.
#[must_use]
pub fn tokenize(name: &str, stopwords: &[String]) -> BTreeSet<String> {
    let all: BTreeSet<String> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| singular(&word.to_lowercase()))
        .collect();

    let filtered: BTreeSet<String> = all
        .iter()
        .filter(|token| !stopwords.iter().any(|stop| stop == *token))
        .cloned()
        .collect();

    if filtered.is_empty() {
        all
    } else {
        filtered
    }
}

fn singular(word: &str) -> String {
    if word.len() > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
    }
    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_owned();
    }
    word.to_owned()
}

/// `|A ∩ B| / |A ∪ B|`, zero when both sets are empty
#[must_use]
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Jaccard similarity of two food names after tokenizing
#[must_use]
pub fn name_similarity(ai_name: &str, reference_description: &str, stopwords: &[String]) -> f64 {
    jaccard(
        &tokenize(ai_name, stopwords),
        &tokenize(reference_description, stopwords),
    )
}

/// `max(0, 1 - |ai - ref| / ai / tolerance)`
///
/// Callers must reject `ai_calories <= 0` before scoring.
#[must_use]
pub fn calorie_similarity(ai_calories: f64, reference_calories: f64, tolerance: f64) -> f64 {
    let relative_error = (ai_calories - reference_calories).abs() / ai_calories;
    (1.0 - relative_error / tolerance).max(0.0)
}
