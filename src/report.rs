use chrono::Duration;
use std::fmt;

use crate::session::{BossRecord, Session, Wing};
use crate::webhook::{Embed, EmbedField, EMBED_ACCENT_COLOR};

/// Suffixes "s" only when the count is greater than one, so "1 pull" but
/// "2 pulls".
pub fn pluralized(count: i64, unit: &str) -> String {
    let suffix = if count > 1 { "s" } else { "" };
    format!("{count}{unit}{suffix}")
}

/// "H:MM:SS" with an unpadded hour field, used for offsets from the session
/// start and for the total session duration.
pub fn format_clock(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

/// "MM:SS", used for kill times and idle gaps.
pub fn format_minutes_seconds(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Spelled-out duration ("1 hr 12 mins 5 secs"); the hour part is omitted
/// when zero.
pub fn format_spoken(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let minutes_part = pluralized(minutes, " min");
    let seconds_part = pluralized(seconds, " sec");
    if hours > 0 {
        format!("{} {minutes_part} {seconds_part}", pluralized(hours, " hr"))
    } else {
        format!("{minutes_part} {seconds_part}")
    }
}

fn boss_title(boss: &BossRecord) -> String {
    let cm_suffix = if boss.challenge_mode { " CM" } else { "" };
    format!("{}{cm_suffix}", boss.name)
}

/// One embed line per boss: linked name, kill time, pull count, comp DPS in
/// thousands.
fn boss_embed_line(boss: &BossRecord) -> String {
    format!(
        "[{}]({}) {} kill time, {}, {}k comp dps",
        boss_title(boss),
        boss.log_url,
        format_minutes_seconds(boss.duration),
        pluralized(i64::from(boss.num_pulls), " pull"),
        boss.comp_dps / 1000
    )
}

fn wing_embed_block(wing: &Wing, session: &Session) -> String {
    let mut block = String::new();
    for boss in &wing.bosses {
        let offset = boss.start_time - session.start_time;
        block.push_str(&format!("{} {}\n", format_clock(offset), boss_embed_line(boss)));
    }
    block
}

/// Assembles the webhook embed for a session: a title with the session date
/// and total duration, one field per wing, and an idle-gap line between
/// consecutive wings.
pub fn session_embed(session: &Session) -> Embed {
    let title = format!(
        "{} Session Total Time: {}",
        session.start_time.format("%m/%d/%y"),
        format_clock(session.duration)
    );

    let mut fields = Vec::with_capacity(session.wings.len());
    for (index, wing) in session.wings.iter().enumerate() {
        let mut block = wing_embed_block(wing, session);

        if let Some(next_wing) = session.wings.get(index + 1) {
            let gap = next_wing.start_time - wing.end_time;
            let offset = wing.end_time - session.start_time;
            block.push_str(&format!(
                "{} Between {}",
                format_clock(offset),
                format_minutes_seconds(gap)
            ));
        }

        fields.push(EmbedField {
            name: format!("{}: {}", wing.wing_label, format_spoken(wing.duration)),
            value: block,
            inline: false,
        });
    }

    Embed {
        title,
        color: EMBED_ACCENT_COLOR,
        fields,
    }
}

impl fmt::Display for BossRecord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_seconds = self.duration.num_seconds().max(0);
        let duration_string = format!(
            "{} {}",
            pluralized(total_seconds / 60, " min"),
            pluralized(total_seconds % 60, " sec")
        );
        write!(
            formatter,
            "**{}** for {duration_string} ({}, {}k comp dps): {}",
            boss_title(self),
            pluralized(i64::from(self.num_pulls), " pull"),
            self.comp_dps / 1000,
            self.log_url
        )
    }
}

impl fmt::Display for Wing {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            formatter,
            "**{}** for {}",
            self.wing_label,
            format_spoken(self.duration)
        )?;
        for boss in &self.bosses {
            writeln!(formatter, "{boss}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "This session took {}", format_clock(self.duration))?;
        for wing in &self.wings {
            write!(formatter, "{wing}")?;
        }
        Ok(())
    }
}
