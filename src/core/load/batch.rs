//! Batch formation

use crate::domain::{AnimalId, CanonicalRecord};

/// An ordered group of records sent in one destination request
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Zero-based position of this batch within the run
    pub index: usize,
    /// Records in source order
    pub records: Vec<CanonicalRecord>,
}

impl Batch {
    /// Create a batch
    pub fn new(index: usize, records: Vec<CanonicalRecord>) -> Self {
        Self { index, records }
    }

    /// Number of records in the batch
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identifiers of the records in the batch
    pub fn record_ids(&self) -> Vec<AnimalId> {
        self.records.iter().map(|record| record.id).collect()
    }
}

/// Groups a stream of records into consecutive batches
///
/// Records are pushed one at a time; a batch is emitted as soon as it holds
/// `batch_size` records, and [`finish`](Self::finish) yields the remainder.
/// A `batch_size` of zero is treated as one.
#[derive(Debug)]
pub struct BatchAccumulator {
    batch_size: usize,
    pending: Vec<CanonicalRecord>,
    next_index: usize,
}

impl BatchAccumulator {
    pub fn new(batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            batch_size,
            pending: Vec::with_capacity(batch_size),
            next_index: 0,
        }
    }

    /// Add a record, returning the batch it completes
    pub fn push(&mut self, record: CanonicalRecord) -> Option<Batch> {
        self.pending.push(record);
        if self.pending.len() >= self.batch_size {
            Some(self.take())
        } else {
            None
        }
    }

    /// Records waiting for their batch to fill
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// The final partial batch, if any records are pending
    pub fn finish(mut self) -> Option<Batch> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.take())
        }
    }

    fn take(&mut self) -> Batch {
        let records = std::mem::replace(&mut self.pending, Vec::with_capacity(self.batch_size));
        let batch = Batch::new(self.next_index, records);
        self.next_index += 1;
        batch
    }
}

/// Split records into consecutive batches of at most `batch_size`
///
/// Every batch except possibly the last holds exactly `batch_size` records.
/// A `batch_size` of zero is treated as one.
///
/// # Examples
///
/// ```
/// use fauna::core::load::partition;
/// use fauna::domain::CanonicalRecord;
///
/// let records: Vec<CanonicalRecord> = (0..5u64)
///     .map(|id| CanonicalRecord::builder().id(id).name("x").build().unwrap())
///     .collect();
///
/// let batches = partition(records, 2);
/// let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
/// assert_eq!(sizes, vec![2, 2, 1]);
/// ```
pub fn partition(records: Vec<CanonicalRecord>, batch_size: usize) -> Vec<Batch> {
    let mut accumulator = BatchAccumulator::new(batch_size);
    let mut batches: Vec<Batch> = records
        .into_iter()
        .filter_map(|record| accumulator.push(record))
        .collect();
    batches.extend(accumulator.finish());
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn records(n: u64) -> Vec<CanonicalRecord> {
        (0..n)
            .map(|id| {
                CanonicalRecord::builder()
                    .id(id)
                    .name(format!("animal-{id}"))
                    .build()
                    .unwrap()
            })
            .collect()
    }

    #[test_case(0, 100 ; "no records")]
    #[test_case(1, 100 ; "single record")]
    #[test_case(100, 100 ; "exactly one batch")]
    #[test_case(101, 100 ; "one over")]
    #[test_case(250, 100 ; "several batches")]
    #[test_case(7, 3 ; "small batches")]
    #[test_case(5, 1 ; "batch of one")]
    fn test_partition_sizes(total: u64, batch_size: usize) {
        let batches = partition(records(total), batch_size);

        let expected_batches = (total as usize).div_ceil(batch_size);
        assert_eq!(batches.len(), expected_batches);

        for (position, batch) in batches.iter().enumerate() {
            assert_eq!(batch.index, position);
            assert!(!batch.is_empty());
            assert!(batch.len() <= batch_size);
            if position + 1 < batches.len() {
                assert_eq!(batch.len(), batch_size);
            }
        }

        let total_out: usize = batches.iter().map(Batch::len).sum();
        assert_eq!(total_out, total as usize);
    }

    #[test]
    fn test_partition_preserves_order() {
        let batches = partition(records(10), 4);
        let ids: Vec<u64> = batches
            .iter()
            .flat_map(|batch| batch.record_ids())
            .map(|id| id.value())
            .collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        assert_eq!(partition(records(3), 0).len(), 3);
    }

    #[test]
    fn test_accumulator_emits_full_batches_as_they_fill() {
        let mut accumulator = BatchAccumulator::new(2);
        let mut records = records(3).into_iter();

        assert!(accumulator.push(records.next().unwrap()).is_none());
        assert_eq!(accumulator.pending_len(), 1);

        let first = accumulator.push(records.next().unwrap()).unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.len(), 2);
        assert_eq!(accumulator.pending_len(), 0);

        assert!(accumulator.push(records.next().unwrap()).is_none());
        let last = accumulator.finish().unwrap();
        assert_eq!(last.index, 1);
        assert_eq!(last.len(), 1);
    }

    #[test]
    fn test_accumulator_finish_without_remainder() {
        let mut accumulator = BatchAccumulator::new(2);
        let emitted: Vec<Batch> = records(4)
            .into_iter()
            .filter_map(|record| accumulator.push(record))
            .collect();
        assert_eq!(emitted.len(), 2);
        assert!(accumulator.finish().is_none());
    }
}
