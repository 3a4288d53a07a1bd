use std::fmt;

/// One group of a ranked aggregate: the group key and its row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub key: Option<String>,
    pub count: u64,
}

impl Tally {
    pub fn new(key: impl Into<String>, count: u64) -> Self {
        Self {
            key: Some(key.into()),
            count,
        }
    }
}

/// A rank-1 ethnicity within one vehicle body style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyStyleLeader {
    pub body_style: Option<String>,
    pub ethnicity: Option<String>,
    pub count: u64,
}

/// What a query hands back to the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Count {
        subject: &'static str,
        count: u64,
    },
    Ranked {
        subject: &'static str,
        keys: Vec<Option<String>>,
    },
    Tallies {
        subject: &'static str,
        key_label: &'static str,
        count_label: &'static str,
        rows: Vec<Tally>,
    },
    Leader {
        subject: &'static str,
        leader: Option<Tally>,
    },
    BodyStyles(Vec<BodyStyleLeader>),
}

struct Key<'a>(&'a Option<String>);

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_deref().unwrap_or("null"))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Count { subject, count } => write!(f, "{subject}: {count}"),
            Report::Ranked { subject, keys } => {
                write!(f, "{subject}:")?;
                if keys.is_empty() {
                    return write!(f, "\n  (none)");
                }
                for key in keys {
                    write!(f, "\n  {}", Key(key))?;
                }
                Ok(())
            }
            Report::Tallies {
                subject,
                key_label,
                count_label,
                rows,
            } => {
                write!(f, "{subject}:")?;
                if rows.is_empty() {
                    return write!(f, "\n  (none)");
                }
                for row in rows {
                    write!(
                        f,
                        "\n  {key_label}: {}, {count_label}: {}",
                        Key(&row.key),
                        row.count
                    )?;
                }
                Ok(())
            }
            Report::Leader { subject, leader } => match leader {
                Some(t) => write!(
                    f,
                    "{subject}: {}\nNumber of crashes: {}",
                    Key(&t.key),
                    t.count
                ),
                None => write!(f, "{subject}: (none)"),
            },
            Report::BodyStyles(rows) => {
                write!(f, "Top ethnic groups for each vehicle body type:")?;
                for row in rows {
                    write!(
                        f,
                        "\n  Body Style: {}, Top Ethnic Group: {}, Count: {}",
                        Key(&row.body_style),
                        Key(&row.ethnicity),
                        row.count
                    )?;
                }
                Ok(())
            }
        }
    }
}
