//! Sequential record sources.

use crate::access::Provider;
use crate::error::QueryResult;

/// An ordered, single-pass stream of records for one table.
///
/// The executor pulls records one at a time and never re-reads. When it has
/// collected enough rows it calls [`RecordSource::stop`] and pulls nothing
/// further. Sources holding external resources release them in `Drop`; the
/// executor takes the source by value so that happens exactly once on every
/// exit path.
pub trait RecordSource {
    type Record: Provider;

    /// Pull the next record, or `None` once the source is exhausted.
    fn next_record(&mut self) -> QueryResult<Option<Self::Record>>;

    /// Early-termination signal. No `next_record` call follows it.
    fn stop(&mut self) {}
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    type Record = S::Record;

    fn next_record(&mut self) -> QueryResult<Option<Self::Record>> {
        (**self).next_record()
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}

/// Adapts an in-memory iterator of records into a [`RecordSource`].
pub struct IterSource<I> {
    iter: I,
    stopped: bool,
}

impl<I> IterSource<I> {
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            stopped: false,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl<I, P> RecordSource for IterSource<I>
where
    I: Iterator<Item = P>,
    P: Provider,
{
    type Record = P;

    fn next_record(&mut self) -> QueryResult<Option<P>> {
        if self.stopped {
            return Ok(None);
        }
        Ok(self.iter.next())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
