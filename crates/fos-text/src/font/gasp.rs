//! `gasp` table: grid-fitting and scan-conversion procedure per ppem range

/// Behavior flags for one ppem range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GaspBehavior(pub u16);

impl GaspBehavior {
    pub const GRIDFIT: u16 = 0x0001;
    pub const DOGRAY: u16 = 0x0002;
    pub const SYMMETRIC_GRIDFIT: u16 = 0x0004;
    pub const SYMMETRIC_SMOOTHING: u16 = 0x0008;

    pub fn grid_fit(self) -> bool {
        self.0 & (Self::GRIDFIT | Self::SYMMETRIC_GRIDFIT) != 0
    }

    /// Grayscale (antialiased) rendering permitted
    pub fn gray(self) -> bool {
        self.0 & Self::DOGRAY != 0
    }

    pub fn symmetric_smoothing(self) -> bool {
        self.0 & Self::SYMMETRIC_SMOOTHING != 0
    }
}

/// One `gasp` range record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaspRange {
    /// Upper limit of the range, inclusive
    pub max_ppem: u16,
    pub behavior: GaspBehavior,
}

/// Parsed `gasp` table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GaspTable {
    pub ranges: Vec<GaspRange>,
}

impl GaspTable {
    pub fn new(ranges: Vec<GaspRange>) -> Self {
        Self { ranges }
    }

    /// Parse raw table bytes (big-endian)
    pub fn parse(data: &[u8]) -> Option<Self> {
        let read_u16 = |offset: usize| -> Option<u16> {
            let bytes = data.get(offset..offset + 2)?;
            Some(u16::from_be_bytes([bytes[0], bytes[1]]))
        };

        let version = read_u16(0)?;
        if version > 1 {
            return None;
        }
        let count = read_u16(2)? as usize;
        let ranges = (0..count)
            .map(|i| {
                let base = 4 + i * 4;
                Some(GaspRange {
                    max_ppem: read_u16(base)?,
                    behavior: GaspBehavior(read_u16(base + 2)?),
                })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self { ranges })
    }

    /// Behavior for a ppem, or `None` when past the last range
    pub fn behavior(&self, ppem: u16) -> Option<GaspBehavior> {
        self.ranges.iter().find(|r| ppem <= r.max_ppem).map(|r| r.behavior)
    }
}
