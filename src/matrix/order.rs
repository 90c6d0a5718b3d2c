use std::fmt;
use std::str::FromStr;

/// One of the six nestings of the `i` (row), `j` (column) and `k`
/// (reduction) loops in `C[i][j] += A[i][k] * B[k][j]`.
///
/// Variants are named outer-to-inner, so `Ikj` runs `i` outermost and `j`
/// innermost. The order only changes memory access patterns; every variant
/// computes the same product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopOrder {
    Ijk,
    Ikj,
    Kij,
    Kji,
    Jik,
    Jki,
}

impl LoopOrder {
    /// All six orders in canonical enumeration order. Ties between orders
    /// are broken by position in this array.
    pub const ALL: [LoopOrder; 6] = [
        LoopOrder::Ijk,
        LoopOrder::Ikj,
        LoopOrder::Kij,
        LoopOrder::Kji,
        LoopOrder::Jik,
        LoopOrder::Jki,
    ];

    /// Canonical report label, e.g. `"i,k,j"`.
    pub fn label(self) -> &'static str {
        match self {
            LoopOrder::Ijk => "i,j,k",
            LoopOrder::Ikj => "i,k,j",
            LoopOrder::Kij => "k,i,j",
            LoopOrder::Kji => "k,j,i",
            LoopOrder::Jik => "j,i,k",
            LoopOrder::Jki => "j,k,i",
        }
    }

    /// Position in [`LoopOrder::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LoopOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLoopOrderError(String);

impl fmt::Display for ParseLoopOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown loop order '{}' (expected a permutation of i, j, k such as ikj)",
            self.0
        )
    }
}

impl std::error::Error for ParseLoopOrderError {}

impl FromStr for LoopOrder {
    type Err = ParseLoopOrderError;

    /// Accepts `ikj`, `i,k,j` or `i-k-j`, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !matches!(c, ',' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match compact.as_str() {
            "ijk" => Ok(LoopOrder::Ijk),
            "ikj" => Ok(LoopOrder::Ikj),
            "kij" => Ok(LoopOrder::Kij),
            "kji" => Ok(LoopOrder::Kji),
            "jik" => Ok(LoopOrder::Jik),
            "jki" => Ok(LoopOrder::Jki),
            _ => Err(ParseLoopOrderError(s.to_string())),
        }
    }
}
