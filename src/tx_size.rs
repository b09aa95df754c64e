//! Transform block geometry and chroma subsampling formats.

/// Number of transform sizes in the catalog, rectangular shapes included.
pub const TX_SIZES_ALL: usize = 19;

/// Transform block sizes, in AV1 catalog order.
///
/// The discriminants are the dispatch-table indices; they must stay in this
/// order because the kernel tables in [`crate::dispatch`] are laid out by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum TxSize {
    Tx4x4 = 0,
    Tx8x8 = 1,
    Tx16x16 = 2,
    Tx32x32 = 3,
    Tx64x64 = 4,
    Tx4x8 = 5,
    Tx8x4 = 6,
    Tx8x16 = 7,
    Tx16x8 = 8,
    Tx16x32 = 9,
    Tx32x16 = 10,
    Tx32x64 = 11,
    Tx64x32 = 12,
    Tx4x16 = 13,
    Tx16x4 = 14,
    Tx8x32 = 15,
    Tx32x8 = 16,
    Tx16x64 = 17,
    Tx64x16 = 18,
}

impl TxSize {
    /// Every size in the catalog, in table order.
    pub const ALL: [TxSize; TX_SIZES_ALL] = [
        TxSize::Tx4x4,
        TxSize::Tx8x8,
        TxSize::Tx16x16,
        TxSize::Tx32x32,
        TxSize::Tx64x64,
        TxSize::Tx4x8,
        TxSize::Tx8x4,
        TxSize::Tx8x16,
        TxSize::Tx16x8,
        TxSize::Tx16x32,
        TxSize::Tx32x16,
        TxSize::Tx32x64,
        TxSize::Tx64x32,
        TxSize::Tx4x16,
        TxSize::Tx16x4,
        TxSize::Tx8x32,
        TxSize::Tx32x8,
        TxSize::Tx16x64,
        TxSize::Tx64x16,
    ];

    /// Block width in samples.
    pub const fn width(self) -> usize {
        match self {
            TxSize::Tx4x4 | TxSize::Tx4x8 | TxSize::Tx4x16 => 4,
            TxSize::Tx8x8 | TxSize::Tx8x4 | TxSize::Tx8x16 | TxSize::Tx8x32 => 8,
            TxSize::Tx16x16
            | TxSize::Tx16x8
            | TxSize::Tx16x32
            | TxSize::Tx16x4
            | TxSize::Tx16x64 => 16,
            TxSize::Tx32x32 | TxSize::Tx32x16 | TxSize::Tx32x64 | TxSize::Tx32x8 => 32,
            TxSize::Tx64x64 | TxSize::Tx64x32 | TxSize::Tx64x16 => 64,
        }
    }

    /// Block height in samples.
    pub const fn height(self) -> usize {
        match self {
            TxSize::Tx4x4 | TxSize::Tx8x4 | TxSize::Tx16x4 => 4,
            TxSize::Tx8x8 | TxSize::Tx4x8 | TxSize::Tx16x8 | TxSize::Tx32x8 => 8,
            TxSize::Tx16x16
            | TxSize::Tx8x16
            | TxSize::Tx32x16
            | TxSize::Tx4x16
            | TxSize::Tx64x16 => 16,
            TxSize::Tx32x32 | TxSize::Tx16x32 | TxSize::Tx8x32 | TxSize::Tx64x32 => 32,
            TxSize::Tx64x64 | TxSize::Tx32x64 | TxSize::Tx16x64 => 64,
        }
    }

    /// Whether CfL prediction is defined for this size.
    ///
    /// Blocks with either dimension above 32 never use CfL; their dispatch
    /// entries are explicit no-ops.
    pub const fn is_cfl_allowed(self) -> bool {
        self.width() <= 32 && self.height() <= 32
    }
}

/// Chroma subsampling format, determining how a luma plane region maps onto
/// the chroma plane's resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromaFormat {
    /// 4:2:0 — chroma halved in both dimensions.
    I420,
    /// 4:2:2 — chroma halved horizontally.
    I422,
    /// 4:4:4 — chroma at full luma resolution.
    I444,
}

impl ChromaFormat {
    /// Horizontal subsampling shift (1 when the chroma plane is half width).
    pub const fn sub_x(self) -> usize {
        match self {
            ChromaFormat::I420 | ChromaFormat::I422 => 1,
            ChromaFormat::I444 => 0,
        }
    }

    /// Vertical subsampling shift (1 when the chroma plane is half height).
    pub const fn sub_y(self) -> usize {
        match self {
            ChromaFormat::I420 => 1,
            ChromaFormat::I422 | ChromaFormat::I444 => 0,
        }
    }

    /// Index into per-format kernel arrays (420, 422, 444 order).
    pub const fn index(self) -> usize {
        match self {
            ChromaFormat::I420 => 0,
            ChromaFormat::I422 => 1,
            ChromaFormat::I444 => 2,
        }
    }

    /// Format from subsampling shifts, mirroring how a decoder selects the
    /// kernel family from its sequence header.
    pub const fn from_subsampling(sub_x: usize, sub_y: usize) -> ChromaFormat {
        if sub_x == 1 {
            if sub_y == 1 {
                ChromaFormat::I420
            } else {
                ChromaFormat::I422
            }
        } else {
            ChromaFormat::I444
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_matches_discriminants() {
        for (i, tx) in TxSize::ALL.iter().enumerate() {
            assert_eq!(*tx as usize, i);
        }
    }

    #[test]
    fn cfl_allowed_set() {
        let invalid = [
            TxSize::Tx64x64,
            TxSize::Tx32x64,
            TxSize::Tx64x32,
            TxSize::Tx16x64,
            TxSize::Tx64x16,
        ];
        for tx in TxSize::ALL {
            assert_eq!(tx.is_cfl_allowed(), !invalid.contains(&tx), "{tx:?}");
        }
    }

    #[test]
    fn format_from_subsampling_round_trips() {
        for fmt in [ChromaFormat::I420, ChromaFormat::I422, ChromaFormat::I444] {
            assert_eq!(ChromaFormat::from_subsampling(fmt.sub_x(), fmt.sub_y()), fmt);
        }
    }
}
