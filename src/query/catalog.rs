//! The ten crash analytics queries.
//!
//! Every query reads only the columns it filters, joins or groups on. Group
//! rankings order by count descending, then by key, so equal counts come back
//! in a stable order.

use polars::prelude::*;

use super::ops::{
    contains, count_column, count_crashes_by, count_rows_by, dedup_crashes, join_on_crash,
    none_of, one_of, ranked, ranked_keys, row_count, string_column, tallies, top, COUNT,
};
use crate::dataset::columns::*;
use crate::dataset::{Dataset, Datasets};
use crate::error::Result;
use crate::report::{BodyStyleLeader, Tally};

const TWO_WHEELERS: [&str; 2] = ["MOTORCYCLE", "POLICE MOTORCYCLE"];
const INVALID_LICENSES: [&str; 2] = ["UNLICENSED", "UNKNOWN"];
const UNINJURED: [&str; 3] = ["NOT INJURED", "UNKNOWN", "NA"];
const UNKNOWN_BODY_STYLES: [&str; 3] = ["UNKNOWN", "NA", "NOT REPORTED"];
const UNKNOWN_STATES: [&str; 3] = ["NA", "Unknown", "Other"];
const SEVERE_DAMAGE: [&str; 3] = ["DAMAGED 5", "DAMAGED 6", "DAMAGED 7 HIGHEST"];
const INSURED: [&str; 4] = [
    "PROOF OF LIABILITY INSURANCE",
    "LIABILITY INSURANCE POLICY",
    "SURETY BOND",
    "CERTIFICATE OF SELF-INSURANCE",
];
/// Marker some exports use for a missing ZIP instead of an empty field.
const NULL_MARKER: &str = "NULL";

/// Crashes in which at least two males were killed.
pub fn male_fatality_crashes(data: &Datasets) -> Result<u64> {
    let person = data.frame(
        Dataset::PrimaryPerson,
        &[CRASH_ID, PRSN_GNDR_ID, PRSN_INJRY_SEV_ID],
    )?;
    let per_crash = count_rows_by(
        person.filter(
            col(PRSN_GNDR_ID)
                .eq(lit("MALE"))
                .and(col(PRSN_INJRY_SEV_ID).eq(lit("KILLED"))),
        ),
        CRASH_ID,
    );
    row_count(per_crash.filter(col(COUNT).gt_eq(lit(2))))
}

/// Distinct crashes involving a motorcycle.
pub fn two_wheeler_crashes(data: &Datasets) -> Result<u64> {
    let units = data.frame(Dataset::Units, &[CRASH_ID, VEH_BODY_STYL_ID])?;
    row_count(dedup_crashes(
        units.filter(one_of(VEH_BODY_STYL_ID, &TWO_WHEELERS)),
    ))
}

/// Top 5 makes where a driver died and the airbag did not deploy.
///
/// Every qualifying person/unit pair counts, so a crash with several such
/// drivers weighs more than once.
pub fn airbag_fatality_makes(data: &Datasets) -> Result<Vec<Option<String>>> {
    let person = data.frame(
        Dataset::PrimaryPerson,
        &[CRASH_ID, PRSN_TYPE_ID, PRSN_AIRBAG_ID, PRSN_INJRY_SEV_ID],
    )?;
    let units = data.frame(Dataset::Units, &[CRASH_ID, VEH_MAKE_ID])?;
    let fatal = join_on_crash(person, units).filter(
        col(PRSN_TYPE_ID)
            .eq(lit("DRIVER"))
            .and(col(PRSN_AIRBAG_ID).eq(lit("NOT DEPLOYED")))
            .and(col(PRSN_INJRY_SEV_ID).eq(lit("KILLED"))),
    );
    ranked_keys(top(count_rows_by(fatal, VEH_MAKE_ID), VEH_MAKE_ID, 5), VEH_MAKE_ID)
}

/// Distinct crashes where a licensed driver was charged with hit and run.
pub fn licensed_hit_and_run_crashes(data: &Datasets) -> Result<u64> {
    let person = data.frame(
        Dataset::PrimaryPerson,
        &[CRASH_ID, PRSN_TYPE_ID, DRVR_LIC_CLS_ID],
    )?;
    let charges = data.frame(Dataset::Charges, &[CRASH_ID, CHARGE])?;
    let hit_and_run = join_on_crash(person, charges)
        .filter(
            none_of(DRVR_LIC_CLS_ID, &INVALID_LICENSES)
                .and(col(PRSN_TYPE_ID).eq(lit("DRIVER"))),
        )
        .filter(contains(CHARGE, "HIT AND RUN"));
    row_count(dedup_crashes(hit_and_run))
}

/// License state with the most person rows whose gender is not `FEMALE`.
///
/// The count is over person rows, so a crash with several such people
/// counts once per person.
pub fn top_non_female_state(data: &Datasets) -> Result<Option<Tally>> {
    let person = data.frame(
        Dataset::PrimaryPerson,
        &[CRASH_ID, PRSN_GNDR_ID, DRVR_LIC_STATE_ID],
    )?;
    let per_state = count_crashes_by(
        person.filter(col(PRSN_GNDR_ID).neq(lit("FEMALE"))),
        &[DRVR_LIC_STATE_ID],
    );
    Ok(tallies(top(per_state, DRVR_LIC_STATE_ID, 1), DRVR_LIC_STATE_ID)?
        .into_iter()
        .next())
}

/// Makes ranked 3rd to 5th by injured-or-killed crashes.
///
/// Computed as the rows of the top 5 that are not among the top 2, each
/// evaluated on its own. At most one person/unit pair per crash counts.
pub fn injury_makes_third_to_fifth(data: &Datasets) -> Result<Vec<Tally>> {
    let person = data.frame(Dataset::PrimaryPerson, &[CRASH_ID, PRSN_INJRY_SEV_ID])?;
    let units = data.frame(Dataset::Units, &[CRASH_ID, VEH_MAKE_ID])?;
    let injured = dedup_crashes(
        join_on_crash(person, units).filter(none_of(PRSN_INJRY_SEV_ID, &UNINJURED)),
    );
    let sorted = ranked(count_crashes_by(injured, &[VEH_MAKE_ID]), VEH_MAKE_ID);

    let top_five = tallies(sorted.clone().limit(5), VEH_MAKE_ID)?;
    let top_two = tallies(sorted.limit(2), VEH_MAKE_ID)?;

    let mut rest: Vec<Tally> = Vec::with_capacity(3);
    for row in top_five {
        if !top_two.contains(&row) && !rest.contains(&row) {
            rest.push(row);
        }
    }
    Ok(rest)
}

/// Most frequent ethnicity per vehicle body style, keeping every tie.
pub fn top_ethnicity_per_body_style(data: &Datasets) -> Result<Vec<BodyStyleLeader>> {
    let person = data.frame(Dataset::PrimaryPerson, &[CRASH_ID, PRSN_ETHNICITY_ID])?;
    let units = data.frame(Dataset::Units, &[CRASH_ID, VEH_BODY_STYL_ID])?;
    let known = join_on_crash(person, units)
        .filter(none_of(VEH_BODY_STYL_ID, &UNKNOWN_BODY_STYLES));

    let leaders = count_crashes_by(known, &[VEH_BODY_STYL_ID, PRSN_ETHNICITY_ID])
        .filter(col(COUNT).eq(col(COUNT).max().over([col(VEH_BODY_STYL_ID)])))
        .sort_by_exprs(
            [col(VEH_BODY_STYL_ID), col(PRSN_ETHNICITY_ID)],
            SortMultipleOptions::default()
                .with_nulls_last(true)
                .with_maintain_order(true),
        )
        .collect()?;

    let styles = string_column(&leaders, VEH_BODY_STYL_ID)?;
    let ethnicities = string_column(&leaders, PRSN_ETHNICITY_ID)?;
    let counts = count_column(&leaders)?;
    Ok(styles
        .into_iter()
        .zip(ethnicities)
        .zip(counts)
        .map(|((body_style, ethnicity), count)| BodyStyleLeader {
            body_style,
            ethnicity,
            count,
        })
        .collect())
}

/// Top 5 driver ZIP codes among crashes with a positive alcohol result.
pub fn alcohol_zip_codes(data: &Datasets) -> Result<Vec<Tally>> {
    let person = data.frame(
        Dataset::PrimaryPerson,
        &[CRASH_ID, PRSN_ALC_RSLT_ID, DRVR_ZIP],
    )?;
    let positive = dedup_crashes(
        person.filter(
            col(PRSN_ALC_RSLT_ID)
                .eq(lit("Positive"))
                .and(none_of(DRVR_ZIP, &[NULL_MARKER])),
        ),
    );
    tallies(top(count_rows_by(positive, DRVR_ZIP), DRVR_ZIP, 5), DRVR_ZIP)
}

/// Distinct crashes with no damaged property, a damage level above 4 and
/// proof of insurance. Only the first damage scale is checked.
pub fn insured_no_damage_crashes(data: &Datasets) -> Result<u64> {
    let units = data.frame(
        Dataset::PrimaryUnits,
        &[CRASH_ID, VEH_DMAG_SCL_1_ID, FIN_RESP_TYPE_ID],
    )?;
    let damages = data.frame(Dataset::Damages, &[CRASH_ID, DAMAGED_PROPERTY])?;
    let matching = join_on_crash(units, damages).filter(
        contains(DAMAGED_PROPERTY, "NO DAMAGE")
            .and(one_of(VEH_DMAG_SCL_1_ID, &SEVERE_DAMAGE))
            .and(one_of(FIN_RESP_TYPE_ID, &INSURED)),
    );
    row_count(dedup_crashes(matching))
}

/// Top 5 makes for speeding-charged drivers licensed in one of the 25
/// states with most crashes, driving one of the 10 most common colors.
///
/// Both top-N cuts are taken over the full tables before any other filter.
pub fn speeding_offence_makes(data: &Datasets) -> Result<Vec<Option<String>>> {
    let person = data.frame(
        Dataset::PrimaryPerson,
        &[CRASH_ID, PRSN_TYPE_ID, DRVR_LIC_STATE_ID],
    )?;
    let charges = data.frame(Dataset::Charges, &[CRASH_ID, CHARGE])?;
    let units = data.frame(Dataset::Units, &[CRASH_ID, VEH_MAKE_ID, VEH_COLOR_ID])?;

    let offences = join_on_crash(person.clone(), charges).filter(
        col(PRSN_TYPE_ID)
            .eq(lit("DRIVER"))
            .and(contains(CHARGE, "SPEED")),
    );

    let states_by_crashes = count_crashes_by(dedup_crashes(person), &[DRVR_LIC_STATE_ID])
        .filter(none_of(DRVR_LIC_STATE_ID, &UNKNOWN_STATES));
    let top_states = present(ranked_keys(
        top(states_by_crashes, DRVR_LIC_STATE_ID, 25),
        DRVR_LIC_STATE_ID,
    )?);
    let offences = offences.filter(one_of(DRVR_LIC_STATE_ID, &top_states));

    let colors_by_crashes = count_crashes_by(dedup_crashes(units.clone()), &[VEH_COLOR_ID]);
    let top_colors = present(ranked_keys(
        top(colors_by_crashes, VEH_COLOR_ID, 10),
        VEH_COLOR_ID,
    )?);
    let units = units.filter(one_of(VEH_COLOR_ID, &top_colors));

    let matched = dedup_crashes(join_on_crash(units, offences));
    ranked_keys(
        top(count_crashes_by(matched, &[VEH_MAKE_ID]), VEH_MAKE_ID, 5),
        VEH_MAKE_ID,
    )
}

/// A null key can rank but never matches an equality filter.
fn present(keys: Vec<Option<String>>) -> Vec<String> {
    keys.into_iter().flatten().collect()
}
