//! Canonical variant locus (`chr:pos:ref:alt`) and its content hash.

use crate::error::{CoreError, Result};
use std::fmt;
use std::str::FromStr;

/// Chromosome, position, reference allele, alternate allele.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cpra {
    pub chr: String,
    pub pos: i64,
    pub ref_allele: String,
    pub alt_allele: String,
}

impl Cpra {
    /// Build from separate columns, as found in ANNOVAR output
    /// (`Chr`, `Start`, `Ref`, `Alt`).
    pub fn from_parts(chr: &str, pos: &str, ref_allele: &str, alt_allele: &str) -> Result<Self> {
        let raw = format!("{chr}:{pos}:{ref_allele}:{alt_allele}");
        raw.parse()
    }

    /// End coordinate implied by the reference allele length. Parsed loci
    /// always have a representable end; hand-built ones saturate.
    pub fn end_pos(&self) -> i64 {
        end_of(self.pos, &self.ref_allele).unwrap_or(i64::MAX)
    }

    /// Lowercase hex MD5 of the canonical locus string.
    pub fn md5sum(&self) -> String {
        format!("{:x}", md5::compute(self.to_string().as_bytes()))
    }
}

impl FromStr for Cpra {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidLocus(s.to_string());
        let parts: Vec<&str> = s.trim().split(':').map(str::trim).collect();
        let [chr, pos, ref_allele, alt_allele] = parts[..] else {
            return Err(invalid());
        };
        let chr = strip_chr_prefix(chr);
        if chr.is_empty() || ref_allele.is_empty() || alt_allele.is_empty() {
            return Err(invalid());
        }
        // Spreadsheet cells sometimes render integer positions as floats.
        let pos = pos
            .strip_suffix(".0")
            .unwrap_or(pos)
            .parse::<i64>()
            .map_err(|_| invalid())?;
        if pos < 1 || end_of(pos, ref_allele).is_none() {
            return Err(invalid());
        }
        Ok(Self {
            chr: chr.to_string(),
            pos,
            ref_allele: ref_allele.to_ascii_uppercase(),
            alt_allele: alt_allele.to_ascii_uppercase(),
        })
    }
}

impl fmt::Display for Cpra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.chr, self.pos, self.ref_allele, self.alt_allele
        )
    }
}

fn end_of(pos: i64, ref_allele: &str) -> Option<i64> {
    let span = i64::try_from(ref_allele.len().max(1)).ok()?;
    pos.checked_add(span - 1)
}

fn strip_chr_prefix(chr: &str) -> &str {
    match chr.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("chr") => &chr[3..],
        _ => chr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn parses_and_formats_round_trip() {
        let cpra: Cpra = "17:43045712:T:C".parse().unwrap();
        assert_eq!(cpra.chr, "17");
        assert_eq!(cpra.pos, 43045712);
        assert_eq!(cpra.to_string(), "17:43045712:T:C");
    }

    #[rstest]
    #[case("chr17:43045712:t:c", "17:43045712:T:C")]
    #[case("CHRX:100:A:G", "X:100:A:G")]
    #[case(" 13 : 32315508 : G : A ", "13:32315508:G:A")]
    #[case("7:140753336.0:A:T", "7:140753336:A:T")]
    fn normalises_input(#[case] raw: &str, #[case] canonical: &str) {
        let cpra: Cpra = raw.parse().unwrap();
        assert_eq!(cpra.to_string(), canonical);
    }

    #[rstest]
    #[case("")]
    #[case("17:43045712:T")]
    #[case("17:abc:T:C")]
    #[case("17:0:T:C")]
    #[case("chr:10:T:C")]
    #[case("17:10::C")]
    #[case("1:9223372036854775807:AA:G")]
    #[case("1:9223372036854775808:A:G")]
    fn rejects_malformed(#[case] raw: &str) {
        assert!(matches!(raw.parse::<Cpra>(), Err(CoreError::InvalidLocus(_))));
    }

    #[test]
    fn md5_is_stable_lowercase_hex() {
        let cpra: Cpra = "1:100:A:G".parse().unwrap();
        let sum = cpra.md5sum();
        assert_eq!(sum.len(), 32);
        assert!(sum.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(sum, Cpra::from_parts("chr1", "100", "a", "g").unwrap().md5sum());
    }

    #[test]
    fn end_pos_spans_reference_allele() {
        let snv: Cpra = "1:100:A:G".parse().unwrap();
        let del: Cpra = "1:100:ATG:A".parse().unwrap();
        assert_eq!(snv.end_pos(), 100);
        assert_eq!(del.end_pos(), 102);
    }

    #[test]
    fn end_pos_at_the_coordinate_limit() {
        let last: Cpra = "1:9223372036854775807:A:G".parse().unwrap();
        assert_eq!(last.end_pos(), i64::MAX);

        let built = Cpra {
            pos: i64::MAX,
            ref_allele: "ACGT".into(),
            ..last
        };
        assert_eq!(built.end_pos(), i64::MAX);
    }
}
