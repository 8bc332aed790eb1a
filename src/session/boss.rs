use chrono::{DateTime, Duration, Utc};

/// One aggregated boss encounter. Starts out describing a single pull and is
/// folded together with later pulls of the same boss through [`merge_pull`],
/// which keeps the best attempt seen so far while `total_start_time` /
/// `total_end_time` keep spanning every merged attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct BossRecord {
    pub log_url: String,
    pub name: String,
    pub challenge_mode: bool,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: Duration,
    pub total_start_time: DateTime<Utc>,
    pub total_end_time: DateTime<Utc>,
    pub success: bool,
    pub comp_dps: i64,
    pub num_pulls: u32,
    pub wing_label: String,
}

impl BossRecord {
    /// Builds the record for the first observed pull of a boss. The total
    /// window starts out as the pull's own window and the counter at one.
    #[allow(clippy::too_many_arguments)]
    pub fn first_pull(
        log_url: String,
        name: String,
        challenge_mode: bool,
        start_time: DateTime<Utc>,
        duration: Duration,
        success: bool,
        comp_dps: i64,
        wing_label: String,
    ) -> Self {
        let end_time = start_time + duration;
        Self {
            log_url,
            name,
            challenge_mode,
            start_time,
            end_time,
            duration,
            total_start_time: start_time,
            total_end_time: end_time,
            success,
            comp_dps,
            num_pulls: 1,
            wing_label,
        }
    }
}

/// Folds one more pull of the same boss into `kept` and returns the merged
/// record.
///
/// Selection policy: a kept success is permanent and is never replaced, not
/// even by a faster success recorded later. Among failures the longer
/// attempt wins; an equal-duration attempt replaces the kept one. The total
/// window widens to the earliest start and latest end on every merge, and
/// the pull counter advances by exactly one.
pub fn merge_pull(kept: &BossRecord, pull: &BossRecord) -> BossRecord {
    debug_assert_eq!(
        kept.name, pull.name,
        "Pulls of different bosses must never be merged"
    );

    let mut merged = if kept.success || kept.duration > pull.duration {
        kept.clone()
    } else {
        BossRecord {
            log_url: pull.log_url.clone(),
            name: pull.name.clone(),
            challenge_mode: pull.challenge_mode,
            start_time: pull.start_time,
            end_time: pull.end_time,
            duration: pull.duration,
            success: pull.success,
            comp_dps: pull.comp_dps,
            wing_label: pull.wing_label.clone(),
            total_start_time: kept.total_start_time,
            total_end_time: kept.total_end_time,
            num_pulls: kept.num_pulls,
        }
    };

    merged.total_start_time = merged.total_start_time.min(pull.start_time);
    merged.total_end_time = merged.total_end_time.max(pull.end_time);
    merged.num_pulls += 1;
    merged
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{merge_pull, BossRecord};
    use chrono::{Duration, TimeZone, Utc};

    pub(crate) fn build_record(
        name: &str,
        wing_label: &str,
        start_offset_secs: i64,
        duration_secs: i64,
        success: bool,
    ) -> BossRecord {
        let start_time = Utc
            .with_ymd_and_hms(2026, 2, 22, 20, 0, 0)
            .single()
            .expect("Test start timestamp should be valid")
            + Duration::seconds(start_offset_secs);
        BossRecord::first_pull(
            format!("https://logs.example/{name}/{start_offset_secs}"),
            name.to_string(),
            false,
            start_time,
            Duration::seconds(duration_secs),
            success,
            150_000,
            wing_label.to_string(),
        )
    }

    #[test]
    fn first_pull_starts_with_its_own_total_window() {
        let record = build_record("Vale Guardian", "Wing 1", 0, 210, false);

        assert_eq!(record.num_pulls, 1);
        assert_eq!(record.total_start_time, record.start_time);
        assert_eq!(record.total_end_time, record.end_time);
        assert_eq!(record.end_time - record.start_time, record.duration);
    }

    #[test]
    fn longer_failure_replaces_shorter_failure() {
        let short_fail = build_record("Gorseval", "Wing 1", 0, 30, false);
        let long_fail = build_record("Gorseval", "Wing 1", 120, 45, false);

        let merged = merge_pull(&short_fail, &long_fail);

        assert_eq!(merged.duration, Duration::seconds(45));
        assert_eq!(merged.log_url, long_fail.log_url);
        assert_eq!(merged.num_pulls, 2);
    }

    #[test]
    fn shorter_failure_only_advances_counter_and_window() {
        let long_fail = build_record("Gorseval", "Wing 1", 0, 90, false);
        let short_fail = build_record("Gorseval", "Wing 1", 200, 20, false);

        let merged = merge_pull(&long_fail, &short_fail);

        assert_eq!(merged.duration, Duration::seconds(90));
        assert_eq!(merged.log_url, long_fail.log_url);
        assert_eq!(merged.num_pulls, 2);
        assert_eq!(merged.total_start_time, long_fail.start_time);
        assert_eq!(merged.total_end_time, short_fail.end_time);
    }

    #[test]
    fn success_freezes_everything_but_counter_and_window() {
        let kill = build_record("Sabetha the Saboteur", "Wing 1", 0, 300, true);
        let late_long_fail = build_record("Sabetha the Saboteur", "Wing 1", 400, 600, false);

        let merged = merge_pull(&kill, &late_long_fail);

        assert!(merged.success);
        assert_eq!(merged.duration, Duration::seconds(300));
        assert_eq!(merged.log_url, kill.log_url);
        assert_eq!(merged.num_pulls, 2);
        assert_eq!(merged.total_end_time, late_long_fail.end_time);
    }

    #[test]
    fn first_success_wins_over_a_faster_later_success() {
        let slow_kill = build_record("Dhuum", "Wing 5", 0, 500, true);
        let fast_kill = build_record("Dhuum", "Wing 5", 600, 280, true);

        let merged = merge_pull(&slow_kill, &fast_kill);

        assert_eq!(merged.duration, Duration::seconds(500));
        assert_eq!(merged.log_url, slow_kill.log_url);
        assert_eq!(merged.num_pulls, 2);
    }

    #[test]
    fn fail_fail_success_keeps_the_success() {
        let fail_a = build_record("Boss A", "Wing 1", 0, 30, false);
        let fail_b = build_record("Boss A", "Wing 1", 60, 45, false);
        let kill = build_record("Boss A", "Wing 1", 150, 20, true);

        let merged = merge_pull(&merge_pull(&fail_a, &fail_b), &kill);

        assert!(merged.success);
        assert_eq!(merged.duration, Duration::seconds(20));
        assert_eq!(merged.num_pulls, 3);
        assert_eq!(merged.total_start_time, fail_a.start_time);
        assert_eq!(merged.total_end_time, kill.end_time);
    }

    #[test]
    fn kept_attempt_depends_on_merge_order_but_counter_does_not() {
        let first_kill = build_record("Qadim", "Wing 6", 0, 420, true);
        let second_kill = build_record("Qadim", "Wing 6", 500, 350, true);

        let forward = merge_pull(&first_kill, &second_kill);
        let reverse = merge_pull(&second_kill, &first_kill);

        assert_eq!(forward.num_pulls, 2);
        assert_eq!(reverse.num_pulls, 2);
        assert_eq!(forward.log_url, first_kill.log_url);
        assert_eq!(reverse.log_url, second_kill.log_url);
        assert_ne!(forward.log_url, reverse.log_url);
    }

    #[test]
    fn total_window_spans_the_extremes_of_all_merged_pulls() {
        let pulls = [
            build_record("Samarog", "Wing 4", 300, 120, false),
            build_record("Samarog", "Wing 4", 0, 90, false),
            build_record("Samarog", "Wing 4", 600, 200, false),
        ];

        let mut merged = pulls[0].clone();
        for pull in &pulls[1..] {
            merged = merge_pull(&merged, pull);
        }

        let earliest_start = pulls
            .iter()
            .map(|pull| pull.start_time)
            .min()
            .expect("Test pulls should not be empty");
        let latest_end = pulls
            .iter()
            .map(|pull| pull.end_time)
            .max()
            .expect("Test pulls should not be empty");

        assert_eq!(merged.total_start_time, earliest_start);
        assert_eq!(merged.total_end_time, latest_end);
        assert_eq!(merged.num_pulls, 3);
        assert!(merged.total_start_time <= merged.start_time);
        assert!(merged.end_time <= merged.total_end_time);
    }
}
