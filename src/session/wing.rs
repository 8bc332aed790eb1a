use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};

use super::boss::{merge_pull, BossRecord};

/// A contiguous run of boss encounters sharing one wing label. Timing is
/// derived from the kept attempts: the first boss's start and the last
/// boss's end bound the wing.
#[derive(Debug, Clone)]
pub struct Wing {
    pub bosses: Vec<BossRecord>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: Duration,
    pub wing_label: String,
}

/// Scan state while grouping a run of attempts into bosses.
enum BossAccumulator {
    Empty,
    Accumulating(BossRecord),
}

impl Wing {
    /// Groups a non-empty, start-time-sorted run of same-wing attempt
    /// records into bosses, merging consecutive records that share a boss
    /// name. Attempts at the same boss separated by another boss stay
    /// separate records.
    pub fn from_records(records: &[BossRecord]) -> Result<Self> {
        let mut bosses: Vec<BossRecord> = Vec::new();
        let mut accumulator = BossAccumulator::Empty;

        for record in records {
            debug_assert_eq!(
                records[0].wing_label, record.wing_label,
                "A wing run must not mix wing labels"
            );
            accumulator = match accumulator {
                BossAccumulator::Empty => BossAccumulator::Accumulating(record.clone()),
                BossAccumulator::Accumulating(current) => {
                    if current.name == record.name {
                        BossAccumulator::Accumulating(merge_pull(&current, record))
                    } else {
                        bosses.push(current);
                        BossAccumulator::Accumulating(record.clone())
                    }
                }
            };
        }

        let BossAccumulator::Accumulating(last_boss) = accumulator else {
            bail!("Cannot build a wing from an empty run of encounter attempts");
        };
        bosses.push(last_boss);

        let start_time = bosses[0].start_time;
        let end_time = bosses[bosses.len() - 1].end_time;
        let wing_label = bosses[0].wing_label.clone();

        Ok(Self {
            bosses,
            start_time,
            end_time,
            duration: end_time - start_time,
            wing_label,
        })
    }
}
