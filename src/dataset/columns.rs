//! Column names read by the query catalog.

pub const CRASH_ID: &str = "CRASH_ID";

// Primary_Person_use
pub const PRSN_TYPE_ID: &str = "PRSN_TYPE_ID";
pub const PRSN_GNDR_ID: &str = "PRSN_GNDR_ID";
pub const PRSN_INJRY_SEV_ID: &str = "PRSN_INJRY_SEV_ID";
pub const PRSN_AIRBAG_ID: &str = "PRSN_AIRBAG_ID";
pub const PRSN_ETHNICITY_ID: &str = "PRSN_ETHNICITY_ID";
pub const PRSN_ALC_RSLT_ID: &str = "PRSN_ALC_RSLT_ID";
pub const DRVR_LIC_CLS_ID: &str = "DRVR_LIC_CLS_ID";
pub const DRVR_LIC_STATE_ID: &str = "DRVR_LIC_STATE_ID";
pub const DRVR_ZIP: &str = "DRVR_ZIP";

// Units_use / Primary_Units_use
pub const VEH_BODY_STYL_ID: &str = "VEH_BODY_STYL_ID";
pub const VEH_MAKE_ID: &str = "VEH_MAKE_ID";
pub const VEH_COLOR_ID: &str = "VEH_COLOR_ID";
pub const VEH_DMAG_SCL_1_ID: &str = "VEH_DMAG_SCL_1_ID";
pub const FIN_RESP_TYPE_ID: &str = "FIN_RESP_TYPE_ID";

// Charges_use
pub const CHARGE: &str = "CHARGE";

// Damages_use
pub const DAMAGED_PROPERTY: &str = "DAMAGED_PROPERTY";
