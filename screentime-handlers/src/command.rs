//! Chat command parsing.

use usage_stats::TrendWindow;

/// A parsed chat command. Arguments are kept raw; each handler validates its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Register,
    Yesterday(Vec<String>),
    Summary,
    Reminder,
    Trendline(Vec<String>),
    RollingAvg,
    Unknown(String),
}

impl Command {
    /// Parses `text`; `None` when it is not a command (does not start with `/`).
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim_start().strip_prefix('/')?;
        let mut parts = rest.split_whitespace();
        let word = parts.next().unwrap_or_default();
        let name = word.split('@').next().unwrap_or_default().to_lowercase();
        let args: Vec<String> = parts.map(str::to_string).collect();

        Some(match name.as_str() {
            "start" | "help" => Self::Start,
            "register" => Self::Register,
            "yesterday" | "y" => Self::Yesterday(args),
            "summary" => Self::Summary,
            "reminder" => Self::Reminder,
            "trendline" => Self::Trendline(args),
            "rolling_avg" => Self::RollingAvg,
            _ => Self::Unknown(word.to_string()),
        })
    }

    /// Name used in log fields.
    pub fn name(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::Register => "register",
            Self::Yesterday(_) => "yesterday",
            Self::Summary => "summary",
            Self::Reminder => "reminder",
            Self::Trendline(_) => "trendline",
            Self::RollingAvg => "rolling_avg",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Validates `/yesterday` arguments: exactly two, each one or two ASCII digits, minutes at
/// most 59. Returns (hours, minutes).
pub fn parse_hours_minutes(args: &[String]) -> Option<(u32, u32)> {
    let [hh, mm] = args else {
        return None;
    };
    let field = |s: &str| -> Option<u32> {
        if (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit()) {
            s.parse().ok()
        } else {
            None
        }
    };
    let (hours, minutes) = (field(hh)?, field(mm)?);
    (minutes <= 59).then_some((hours, minutes))
}

/// Parses the optional `/trendline` period in days. `None` when the argument is invalid.
pub fn parse_trend_window(args: &[String]) -> Option<TrendWindow> {
    match args {
        [] => Some(TrendWindow::AllTime),
        [days] => match days.parse::<u32>() {
            Ok(n) if n > 0 => Some(TrendWindow::LastDays(n)),
            _ => None,
        },
        _ => None,
    }
}
