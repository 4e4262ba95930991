// SPDX-License-Identifier: Apache-2.0

use crate::parse_error::ErrorKind;

/// Converts the text of a number token into a double.
///
/// Parsing is locale-independent. The tokenizer only emits `Number` for runs
/// that `f64` accepts, so a failure here means the text did not come from a
/// `Number` token.
pub fn parse_f64(text: &str) -> Result<f64, ErrorKind> {
    text.parse::<f64>().map_err(|_| ErrorKind::InvalidNumber)
}
