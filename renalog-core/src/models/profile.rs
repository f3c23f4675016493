use serde::de::Deserializer;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Clinical CKD severity classification, driving nutrient limit lookup.
///
/// Stored values arrive as either numbers or strings; anything unrecognized
/// decodes as `NotApplicable` so an unknown stage never tightens limits
/// below the least-restrictive baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CkdStage {
    Stage1,
    Stage2,
    Stage3,
    Stage4,
    Stage5,
    #[default]
    NotApplicable,
}

impl CkdStage {
    pub fn as_number(&self) -> Option<u8> {
        match self {
            CkdStage::Stage1 => Some(1),
            CkdStage::Stage2 => Some(2),
            CkdStage::Stage3 => Some(3),
            CkdStage::Stage4 => Some(4),
            CkdStage::Stage5 => Some(5),
            CkdStage::NotApplicable => None,
        }
    }

    fn from_number(n: i64) -> CkdStage {
        match n {
            1 => CkdStage::Stage1,
            2 => CkdStage::Stage2,
            3 => CkdStage::Stage3,
            4 => CkdStage::Stage4,
            5 => CkdStage::Stage5,
            _ => CkdStage::NotApplicable,
        }
    }
}

impl fmt::Display for CkdStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_number() {
            Some(n) => write!(f, "{}", n),
            None => write!(f, "N/A"),
        }
    }
}

impl FromStr for CkdStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(CkdStage::Stage1),
            "2" => Ok(CkdStage::Stage2),
            "3" => Ok(CkdStage::Stage3),
            "4" => Ok(CkdStage::Stage4),
            "5" => Ok(CkdStage::Stage5),
            "N/A" | "n/a" | "na" | "unknown" => Ok(CkdStage::NotApplicable),
            _ => Err(format!(
                "Invalid CKD stage '{}'. Valid options: 1-5, N/A",
                s
            )),
        }
    }
}

impl Serialize for CkdStage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_number() {
            Some(n) => serializer.serialize_u8(n),
            None => serializer.serialize_str("N/A"),
        }
    }
}

impl<'de> Deserialize<'de> for CkdStage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(i64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(CkdStage::from_number(n)),
            Repr::Text(s) => Ok(CkdStage::from_str(&s).unwrap_or(CkdStage::NotApplicable)),
        }
    }
}

/// CKD-specific profile data, one document per user.
///
/// Created at onboarding, mutated only through [`ProfileUpdate`]. A brand-new
/// profile (the `Default`) has stage N/A and no preferences.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub ckd_stage: CkdStage,
    pub dietary_preferences: Vec<String>,
    /// Clinician-supplied daily fluid cap in mL; overrides the stage default.
    pub fluid_limit: Option<u32>,
    /// Informational only.
    pub egfr_value: Option<f64>,
    pub doctor_notes: String,
}

/// The explicit patch applied by a profile update. All editable fields are
/// written together, matching the single profile-edit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub ckd_stage: CkdStage,
    pub dietary_preferences: Vec<String>,
    pub fluid_limit: Option<u32>,
    pub egfr_value: Option<f64>,
    pub doctor_notes: String,
}

impl ProfileUpdate {
    /// A patch pre-filled from the current profile, for partial edits.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            ckd_stage: profile.ckd_stage,
            dietary_preferences: profile.dietary_preferences.clone(),
            fluid_limit: profile.fluid_limit,
            egfr_value: profile.egfr_value,
            doctor_notes: profile.doctor_notes.clone(),
        }
    }

    /// The profile this patch produces. Every editable field is written, so
    /// the previous profile does not participate.
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            ckd_stage: self.ckd_stage,
            dietary_preferences: self.dietary_preferences.clone(),
            fluid_limit: self.fluid_limit,
            egfr_value: self.egfr_value,
            doctor_notes: self.doctor_notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_from_number_and_string() {
        let from_num: CkdStage = serde_json::from_str("4").unwrap();
        assert_eq!(from_num, CkdStage::Stage4);

        let from_str: CkdStage = serde_json::from_str("\"4\"").unwrap();
        assert_eq!(from_str, CkdStage::Stage4);

        let na: CkdStage = serde_json::from_str("\"N/A\"").unwrap();
        assert_eq!(na, CkdStage::NotApplicable);
    }

    #[test]
    fn test_unrecognized_stage_falls_back_to_na() {
        let stage: CkdStage = serde_json::from_str("\"6\"").unwrap();
        assert_eq!(stage, CkdStage::NotApplicable);

        let stage: CkdStage = serde_json::from_str("0").unwrap();
        assert_eq!(stage, CkdStage::NotApplicable);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(format!("{}", CkdStage::Stage3), "3");
        assert_eq!(format!("{}", CkdStage::NotApplicable), "N/A");
    }

    #[test]
    fn test_default_profile() {
        let profile = UserProfile::default();
        assert_eq!(profile.ckd_stage, CkdStage::NotApplicable);
        assert!(profile.dietary_preferences.is_empty());
        assert!(profile.fluid_limit.is_none());
    }

    #[test]
    fn test_profile_decodes_with_missing_fields() {
        let profile: UserProfile = serde_json::from_str(r#"{"ckdStage": 3}"#).unwrap();
        assert_eq!(profile.ckd_stage, CkdStage::Stage3);
        assert_eq!(profile.doctor_notes, "");
    }

    #[test]
    fn test_update_produces_profile() {
        let mut update = ProfileUpdate::from_profile(&UserProfile::default());
        update.ckd_stage = CkdStage::Stage4;
        update.fluid_limit = Some(1200);

        let updated = update.to_profile();
        assert_eq!(updated.ckd_stage, CkdStage::Stage4);
        assert_eq!(updated.fluid_limit, Some(1200));
        // Unedited fields carry the values pre-filled from the source profile
        assert!(updated.dietary_preferences.is_empty());
    }
}
