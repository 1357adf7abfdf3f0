use std::{error, fmt};

/// An error and its whole `source()` chain, on a single line.
pub struct CompactChain<'e, E: ?Sized>(&'e E);

impl<E> fmt::Display for CompactChain<'_, E>
where
    E: error::Error + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0, f)?;
        let mut source = self.0.source();
        while let Some(err) = source {
            write!(f, ": {err}")?;
            source = err.source();
        }
        Ok(())
    }
}

pub trait FmtCompact {
    type Report: fmt::Display;
    fn fmt_compact(self) -> Self::Report;
}

impl<'e, E> FmtCompact for &'e E
where
    E: error::Error + ?Sized,
{
    type Report = CompactChain<'e, E>;

    fn fmt_compact(self) -> Self::Report {
        CompactChain(self)
    }
}
