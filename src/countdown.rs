use time::OffsetDateTime;


pub type EpochMillis = i64;

const MILLIS_PER_SECOND: i64 = 1000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;

pub const EXPIRED_DISPLAY: &str = "00:00";


pub fn epoch_millis_now() -> EpochMillis {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as EpochMillis
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CountdownTick {
    pub display: String,
    // True only on the tick that crossed the deadline.
    pub expired: bool,
}

// Counts down to an absolute deadline provided by the server. The deadline is compared against
// the local clock, so clock skew between client and server shifts the display; this is accepted.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Countdown {
    deadline: Option<EpochMillis>,
}

impl Countdown {
    pub fn new() -> Self { Countdown { deadline: None } }

    pub fn arm(&mut self, deadline: Option<EpochMillis>) { self.deadline = deadline; }
    pub fn disarm(&mut self) { self.deadline = None; }
    pub fn is_armed(&self) -> bool { self.deadline.is_some() }

    // Returns `None` when disarmed: nothing to show and nothing to report. Reaching the deadline
    // disarms the countdown, so expiry is reported exactly once.
    pub fn tick(&mut self, now: EpochMillis) -> Option<CountdownTick> {
        let deadline = self.deadline?;
        // The deadline comes from the server and may be arbitrary.
        let remaining = deadline.saturating_sub(now);
        if remaining > 0 {
            Some(CountdownTick { display: format_remaining(remaining), expired: false })
        } else {
            self.deadline = None;
            Some(CountdownTick { display: EXPIRED_DISPLAY.to_owned(), expired: true })
        }
    }
}

// "MM:SS". Hours are dropped: rounds never come close to an hour.
pub fn format_remaining(remaining: EpochMillis) -> String {
    let remaining = remaining.max(0);
    let minutes = (remaining % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
    let seconds = (remaining % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;
    format!("{minutes:02}:{seconds:02}")
}
