pub mod catalog;
pub mod ops;

use std::{fmt, time::Instant};

use tracing::debug;

use crate::dataset::{Dataset, Datasets};
use crate::error::Result;
use crate::report::Report;

/// The fixed query catalog, numbered as in the interactive menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    MaleFatalities,
    TwoWheelers,
    AirbagFatalityMakes,
    LicensedHitAndRun,
    NonFemaleState,
    InjuryMakesThirdToFifth,
    EthnicityByBodyStyle,
    AlcoholZipCodes,
    InsuredNoDamage,
    SpeedingOffenceMakes,
}

impl Query {
    pub const ALL: [Query; 10] = [
        Query::MaleFatalities,
        Query::TwoWheelers,
        Query::AirbagFatalityMakes,
        Query::LicensedHitAndRun,
        Query::NonFemaleState,
        Query::InjuryMakesThirdToFifth,
        Query::EthnicityByBodyStyle,
        Query::AlcoholZipCodes,
        Query::InsuredNoDamage,
        Query::SpeedingOffenceMakes,
    ];

    pub fn number(self) -> u8 {
        match self {
            Query::MaleFatalities => 1,
            Query::TwoWheelers => 2,
            Query::AirbagFatalityMakes => 3,
            Query::LicensedHitAndRun => 4,
            Query::NonFemaleState => 5,
            Query::InjuryMakesThirdToFifth => 6,
            Query::EthnicityByBodyStyle => 7,
            Query::AlcoholZipCodes => 8,
            Query::InsuredNoDamage => 9,
            Query::SpeedingOffenceMakes => 10,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.number() == n)
    }

    pub fn title(self) -> &'static str {
        match self {
            Query::MaleFatalities => "Find crashes where males killed > 2",
            Query::TwoWheelers => "How many two-wheelers are booked for crashes?",
            Query::AirbagFatalityMakes => {
                "Determine Top 5 Vehicle Makes (driver died, airbags not deployed)"
            }
            Query::LicensedHitAndRun => "Vehicles with valid license involved in hit and run",
            Query::NonFemaleState => "State with the highest non-female accidents",
            Query::InjuryMakesThirdToFifth => "Top 3rd to 5th Vehicle Makes causing injuries/deaths",
            Query::EthnicityByBodyStyle => "Top ethnic groups for each vehicle body type",
            Query::AlcoholZipCodes => "Top 5 ZIP codes with alcohol as contributing factor",
            Query::InsuredNoDamage => {
                "Count of Distinct Crash IDs where No Damaged Property was observed and Damage Level is above 4 and car avails Insurance"
            }
            Query::SpeedingOffenceMakes => {
                "Top 5 Vehicle Makes where drivers are charged with speeding related offences, used top 10 used vehicle colours and has car licensed with the Top 25 states with highest number of offences"
            }
        }
    }

    /// Tables the query reads; any of them missing fails the query.
    pub fn datasets(self) -> &'static [Dataset] {
        use Dataset::*;
        match self {
            Query::MaleFatalities | Query::NonFemaleState | Query::AlcoholZipCodes => {
                &[PrimaryPerson]
            }
            Query::TwoWheelers => &[Units],
            Query::AirbagFatalityMakes
            | Query::InjuryMakesThirdToFifth
            | Query::EthnicityByBodyStyle => &[PrimaryPerson, Units],
            Query::LicensedHitAndRun => &[PrimaryPerson, Charges],
            Query::InsuredNoDamage => &[PrimaryUnits, Damages],
            Query::SpeedingOffenceMakes => &[PrimaryPerson, Charges, Units],
        }
    }

    /// Evaluate the query against `data`.
    #[tracing::instrument(level = "info", skip(self, data), fields(query = self.number()))]
    pub fn run(self, data: &Datasets) -> Result<Report> {
        let started = Instant::now();
        let report = match self {
            Query::MaleFatalities => Report::Count {
                subject: "Number of crashes where males killed >= 2",
                count: catalog::male_fatality_crashes(data)?,
            },
            Query::TwoWheelers => Report::Count {
                subject: "Number of crashes involving 2 wheelers",
                count: catalog::two_wheeler_crashes(data)?,
            },
            Query::AirbagFatalityMakes => Report::Ranked {
                subject: "Top 5 Vehicle Makes where airbags did not deploy and driver died",
                keys: catalog::airbag_fatality_makes(data)?,
            },
            Query::LicensedHitAndRun => Report::Count {
                subject: "Number of vehicles involved in a crash with valid driver's license and hit and run",
                count: catalog::licensed_hit_and_run_crashes(data)?,
            },
            Query::NonFemaleState => Report::Leader {
                subject: "State with highest non-female accident is",
                leader: catalog::top_non_female_state(data)?,
            },
            Query::InjuryMakesThirdToFifth => Report::Tallies {
                subject: "Top 3rd to 5th Vehicle Makes causing the largest number of injuries including death",
                key_label: "Vehicle Make",
                count_label: "Number of Injuries/Deaths",
                rows: catalog::injury_makes_third_to_fifth(data)?,
            },
            Query::EthnicityByBodyStyle => {
                Report::BodyStyles(catalog::top_ethnicity_per_body_style(data)?)
            }
            Query::AlcoholZipCodes => Report::Tallies {
                subject: "Top 5 ZIP codes with alcohol as the contributing factor to a crash",
                key_label: "Driver Zip Code",
                count_label: "Count",
                rows: catalog::alcohol_zip_codes(data)?,
            },
            Query::InsuredNoDamage => Report::Count {
                subject: "Distinct Crash IDs where there was no damage and the car availed insurance are",
                count: catalog::insured_no_damage_crashes(data)?,
            },
            Query::SpeedingOffenceMakes => Report::Ranked {
                subject: "Top 5 Vehicle Makes for speeding drivers in the top 25 states using the top 10 colours",
                keys: catalog::speeding_offence_makes(data)?,
            },
        };
        debug!(elapsed = ?started.elapsed(), "query finished");
        Ok(report)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;
    use polars::prelude::*;

    #[test]
    fn numbers_cover_one_to_ten() {
        for (i, q) in Query::ALL.iter().enumerate() {
            assert_eq!(q.number() as usize, i + 1);
            assert_eq!(Query::from_number(q.number()), Some(*q));
        }
        assert_eq!(Query::from_number(0), None);
        assert_eq!(Query::from_number(11), None);
    }

    #[test]
    fn every_query_fails_cleanly_without_data() {
        let empty = Datasets::new();
        for q in Query::ALL {
            match q.run(&empty) {
                Err(AnalyticsError::DatasetNotFound(name)) => {
                    assert!(q.datasets().iter().any(|d| d.name() == name), "{q}: {name}");
                }
                other => panic!("{q}: expected DatasetNotFound, got {other:?}"),
            }
        }
    }

    #[test]
    fn one_failing_query_leaves_others_intact() {
        let data = Datasets::new()
            .with(
                Dataset::Units,
                df!(
                    "CRASH_ID" => ["1", "1", "2"],
                    "VEH_BODY_STYL_ID" => ["MOTORCYCLE", "MOTORCYCLE", "SUV"],
                )
                .unwrap(),
            )
            .unwrap();

        assert!(Query::MaleFatalities.run(&data).is_err());
        assert_eq!(
            Query::TwoWheelers.run(&data).unwrap(),
            Report::Count {
                subject: "Number of crashes involving 2 wheelers",
                count: 1,
            }
        );
    }

    #[test]
    fn male_fatality_report_end_to_end() {
        let data = Datasets::new()
            .with(
                Dataset::PrimaryPerson,
                df!(
                    "CRASH_ID" => ["C1", "C1", "C2"],
                    "PRSN_GNDR_ID" => ["MALE", "MALE", "MALE"],
                    "PRSN_INJRY_SEV_ID" => ["KILLED", "KILLED", "KILLED"],
                )
                .unwrap(),
            )
            .unwrap();
        let report = Query::MaleFatalities.run(&data).unwrap();
        assert_eq!(
            report.to_string(),
            "Number of crashes where males killed >= 2: 1"
        );
    }
}
