//! Transition records produced by a render pass.
//!
//! The scene always holds the settled values. A host that animates reads
//! the records and drives `value_at` over `duration_ms`.

use serde::{Deserialize, Serialize};

use crate::core::curve::write_num;

/// Which property of an element changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionTarget {
    Attribute(String),
    Style(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    /// Key of the series whose element changes.
    pub key: String,
    pub target: TransitionTarget,
    pub from: String,
    pub to: String,
    pub duration_ms: u64,
}

impl Transition {
    /// Interpolated value at eased progress `t` in `[0, 1]`.
    #[must_use]
    pub fn value_at(&self, t: f64) -> String {
        interpolate_string(&self.from, &self.to, ease_cubic_in_out(t))
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Symmetric cubic easing, the default pacing for chart transitions.
#[must_use]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = 2.0 * t - 2.0;
        0.5 * u * u * u + 1.0
    }
}

/// Byte ranges of the numbers embedded in `s`.
fn number_spans(s: &str) -> Vec<(usize, usize)> {
    let bytes = s.as_bytes();
    let digits_from = |mut j: usize| {
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        j
    };

    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let start = i;
        let mut j = i;
        if matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }

        let has_int = j < bytes.len() && bytes[j].is_ascii_digit();
        if has_int {
            j = digits_from(j);
            if j < bytes.len() && bytes[j] == b'.' {
                j = digits_from(j + 1);
            }
        } else if j + 1 < bytes.len() && bytes[j] == b'.' && bytes[j + 1].is_ascii_digit() {
            j = digits_from(j + 1);
        } else {
            i += 1;
            continue;
        }

        if j < bytes.len() && matches!(bytes[j], b'e' | b'E') {
            let mut k = j + 1;
            if k < bytes.len() && matches!(bytes[k], b'+' | b'-') {
                k += 1;
            }
            if k < bytes.len() && bytes[k].is_ascii_digit() {
                j = digits_from(k);
            }
        }

        spans.push((start, j));
        i = j;
    }
    spans
}

/// Interpolates the numbers embedded in two strings.
///
/// The text of `to` is the template: its n-th number moves from the n-th
/// number of `from`; numbers without a counterpart keep their `to` value.
#[must_use]
pub fn interpolate_string(from: &str, to: &str, t: f64) -> String {
    if t >= 1.0 {
        return to.to_owned();
    }

    let from_numbers: Vec<f64> = number_spans(from)
        .into_iter()
        .filter_map(|(s, e)| from[s..e].parse().ok())
        .collect();

    let mut out = String::with_capacity(to.len());
    let mut last = 0;
    for (n, (start, end)) in number_spans(to).into_iter().enumerate() {
        out.push_str(&to[last..start]);
        let text = &to[start..end];
        match (from_numbers.get(n), text.parse::<f64>()) {
            (Some(&a), Ok(b)) => write_num(&mut out, a + (b - a) * t),
            _ => out.push_str(text),
        }
        last = end;
    }
    out.push_str(&to[last..]);
    out
}
