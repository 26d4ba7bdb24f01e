//! Lexical features of a domain label, shared by the scorer, the
//! portfolio analyzer, the period calculator and the market simulator.

use std::collections::HashMap;

const VOWELS: &str = "aeiouy";

/// Normalize a domain to its label: trim, lowercase, strip `.{tld}`,
/// trim stray dots. `"  Creator-Hub.FUN "` → `"creator-hub"`.
pub fn label_of(domain: &str, tld: &str) -> String {
    let d = domain.trim().to_lowercase();
    let suffix = format!(".{tld}");
    let base = d.strip_suffix(&suffix).unwrap_or(&d);
    base.trim_matches('.').to_string()
}

/// Split a label into lowercase alphanumeric tokens on hyphens and any
/// other non-alphanumeric boundary, dropping the TLD word itself.
pub fn tokens_of(label: &str, tld: &str) -> Vec<String> {
    label
        .split('-')
        .flat_map(|part| part.split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit())))
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && t != tld)
        .collect()
}

/// Alphabetic tokens of at least three letters, used for trend counting.
pub fn trend_tokens(label: &str) -> impl Iterator<Item = String> + '_ {
    label
        .split('-')
        .map(letters_only)
        .filter(|t| t.chars().count() >= 3)
}

pub fn letters_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_lowercase()).collect()
}

pub fn has_digits(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

pub fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

/// Vowel share of the letters in `word`, in [0, 1]. 0 when no letters.
pub fn vowel_ratio(word: &str) -> f64 {
    let letters = letters_only(word);
    if letters.is_empty() {
        return 0.0;
    }
    let vowels = letters.chars().filter(|c| is_vowel(*c)).count();
    vowels as f64 / letters.chars().count() as f64
}

/// Vowel share as a rounded integer percentage.
pub fn vowel_pct(word: &str) -> u32 {
    (vowel_ratio(word) * 100.0).round() as u32
}

/// Number of vowel groups, a rough syllable count.
pub fn syllable_groups(word: &str) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for c in word.chars() {
        let v = is_vowel(c);
        if v && !in_group {
            groups += 1;
        }
        in_group = v;
    }
    groups
}

/// Run-length encode a label's character classes: letters `a`,
/// digits `#`, hyphen `-`, anything else `?`. `"meme-lab42"` → `"a4-1a3#2"`.
pub fn shape_of_label(label: &str) -> String {
    let classes: Vec<char> = label
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' => 'a',
            '0'..='9' => '#',
            '-' => '-',
            _ => '?',
        })
        .collect();

    let mut out = String::new();
    let mut i = 0;
    while i < classes.len() {
        let ch = classes[i];
        let mut j = i + 1;
        while j < classes.len() && classes[j] == ch {
            j += 1;
        }
        out.push(ch);
        out.push_str(&(j - i).to_string());
        i = j;
    }
    out
}

/// Character-class totals decoded from a shape encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeRuns {
    pub letters: usize,
    pub digits: usize,
    pub hyphens: usize,
    pub other: usize,
}

impl ShapeRuns {
    /// Decode every `<class><count>` pair; unrecognized characters are skipped.
    pub fn parse(shape: &str) -> Self {
        let chars: Vec<char> = shape.chars().collect();
        let mut runs = Self::default();
        let mut i = 0;
        while i < chars.len() {
            let class = chars[i];
            let is_class = matches!(class, 'a' | '#' | '-' | '?');
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            if !is_class || j == i + 1 {
                i += 1;
                continue;
            }
            let count: usize = chars[i + 1..j]
                .iter()
                .collect::<String>()
                .parse()
                .unwrap_or(0);
            match class {
                'a' => runs.letters += count,
                '#' => runs.digits += count,
                '-' => runs.hyphens += count,
                _ => runs.other += count,
            }
            i = j;
        }
        runs
    }

    pub fn total(&self) -> usize {
        self.letters + self.digits + self.hyphens + self.other
    }
}

/// Most frequent items, descending by count; ties keep first-seen order.
pub fn top_n<I>(items: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for item in items {
        match index.get(&item) {
            Some(&at) => order[at].1 += 1,
            None => {
                index.insert(item.clone(), order.len());
                order.push((item, 1));
            }
        }
    }
    // stable sort keeps insertion order among equal counts
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.truncate(n);
    order
}
