/// Sequence number identifying one fetch issued by a controller.
///
/// Only the response whose sequence number still equals the live counter at
/// completion time is processed; everything older is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FetchSeq(u64);

impl FetchSeq {
    pub fn next(self) -> FetchSeq {
        FetchSeq(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for FetchSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
