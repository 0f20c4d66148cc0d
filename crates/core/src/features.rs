//! Shared feature schema for suspect physical attributes.
//!
//! One ordered table drives the intake form (labels, sections, option lists),
//! the database column set, and the prompt compiler. Table order is the
//! canonical order: identity, body and face, hair, facial hair, eyes, nose,
//! mouth, ears, skin, accessories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Literal option value meaning "this feature is not present".
pub const NONE_SENTINEL: &str = "None";

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// A fixed physical-attribute feature key.
///
/// Declaration order is the canonical order, so `Ord` sorts features the way
/// they appear in the form and in a compiled prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    Gender,
    Age,
    Ethnicity,
    HeightFeet,
    BodyType,
    HeadShape,
    ChinShape,
    HairLength,
    HairTexture,
    HairStyle,
    HairlineShape,
    FacialHairType,
    BeardColor,
    EyebrowType,
    EyeShape,
    EyeColor,
    EyeSizeSpacing,
    EyelidType,
    Eyelashes,
    EyeBagsWrinkles,
    NoseShape,
    BridgeHeight,
    NostrilWidth,
    NoseTipShape,
    LipThickness,
    LipShape,
    MouthWidth,
    SmileType,
    EarSize,
    EarShape,
    EarLobes,
    HelixAntihelix,
    SkinTone,
    OtherSkinFeatures,
    Accessories,
}

impl FeatureKey {
    /// The snake_case key, which is also the database column name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Age => "age",
            Self::Ethnicity => "ethnicity",
            Self::HeightFeet => "height_feet",
            Self::BodyType => "body_type",
            Self::HeadShape => "head_shape",
            Self::ChinShape => "chin_shape",
            Self::HairLength => "hair_length",
            Self::HairTexture => "hair_texture",
            Self::HairStyle => "hair_style",
            Self::HairlineShape => "hairline_shape",
            Self::FacialHairType => "facial_hair_type",
            Self::BeardColor => "beard_color",
            Self::EyebrowType => "eyebrow_type",
            Self::EyeShape => "eye_shape",
            Self::EyeColor => "eye_color",
            Self::EyeSizeSpacing => "eye_size_spacing",
            Self::EyelidType => "eyelid_type",
            Self::Eyelashes => "eyelashes",
            Self::EyeBagsWrinkles => "eye_bags_wrinkles",
            Self::NoseShape => "nose_shape",
            Self::BridgeHeight => "bridge_height",
            Self::NostrilWidth => "nostril_width",
            Self::NoseTipShape => "nose_tip_shape",
            Self::LipThickness => "lip_thickness",
            Self::LipShape => "lip_shape",
            Self::MouthWidth => "mouth_width",
            Self::SmileType => "smile_type",
            Self::EarSize => "ear_size",
            Self::EarShape => "ear_shape",
            Self::EarLobes => "ear_lobes",
            Self::HelixAntihelix => "helix_antihelix",
            Self::SkinTone => "skin_tone",
            Self::OtherSkinFeatures => "other_skin_features",
            Self::Accessories => "accessories",
        }
    }

    /// Schema entry for this key.
    pub fn def(self) -> &'static FeatureDef {
        &FEATURE_SCHEMA[self as usize]
    }

    /// Title-cased key for reports, e.g. `eye_size_spacing` -> `Eye Size Spacing`.
    pub fn display_name(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FEATURE_SCHEMA
            .iter()
            .find(|def| def.key.as_str() == s)
            .map(|def| def.key)
            .ok_or_else(|| CoreError::Validation(format!("Unknown feature key '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Schema entries
// ---------------------------------------------------------------------------

/// Form section a feature is rendered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSection {
    PersonalInformation,
    BodyAndFace,
    Hair,
    FacialHair,
    Eyes,
    Nose,
    Mouth,
    Ears,
    SkinAndAccessories,
}

/// Storage type of a feature value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Text,
    Integer,
    Decimal,
}

/// One row of the feature schema.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureDef {
    pub key: FeatureKey,
    pub section: FeatureSection,
    /// Label shown next to the form control.
    pub form_label: &'static str,
    /// Label used in compiled prompts. `None` keeps the feature out of prompts.
    pub prompt_label: Option<&'static str>,
    pub kind: FeatureKind,
    /// Whether the literal [`NONE_SENTINEL`] means "absent" for this feature.
    pub none_sentinel: bool,
    /// Feature that must be present (and not the sentinel) for this one to render.
    pub gated_by: Option<FeatureKey>,
    /// Suggested select options. Empty means free text or numeric input.
    pub options: &'static [&'static str],
}

const fn text(
    key: FeatureKey,
    section: FeatureSection,
    form_label: &'static str,
    prompt_label: &'static str,
    options: &'static [&'static str],
) -> FeatureDef {
    FeatureDef {
        key,
        section,
        form_label,
        prompt_label: Some(prompt_label),
        kind: FeatureKind::Text,
        none_sentinel: false,
        gated_by: None,
        options,
    }
}

const fn with_sentinel(def: FeatureDef) -> FeatureDef {
    FeatureDef {
        none_sentinel: true,
        ..def
    }
}

const fn gated(def: FeatureDef, by: FeatureKey) -> FeatureDef {
    FeatureDef {
        gated_by: Some(by),
        ..def
    }
}

use FeatureKey as K;
use FeatureSection as S;

/// The full ordered schema. Index `i` holds the key whose discriminant is `i`.
pub static FEATURE_SCHEMA: [FeatureDef; 35] = [
    text(K::Gender, S::PersonalInformation, "Gender", "Gender", &["Male", "Female", "Other"]),
    FeatureDef {
        key: K::Age,
        section: S::PersonalInformation,
        form_label: "Age",
        prompt_label: Some("Age"),
        kind: FeatureKind::Integer,
        none_sentinel: false,
        gated_by: None,
        options: &[],
    },
    text(
        K::Ethnicity,
        S::PersonalInformation,
        "Ethnicity",
        "Ethnicity",
        &[
            "Indian",
            "North Indian",
            "South Indian",
            "East Indian",
            "Nepali",
            "African",
            "Asian",
            "European",
            "Latin American",
            "Middle Eastern",
            "Oceanian",
            "South Asian",
            "Southeast Asian",
            "Central Asian",
            "Nordic",
            "Mediterranean",
            "Afro-Caribbean",
            "Afro-Latinx",
            "Biracial/Multiracial",
            "Afro-Asian",
        ],
    ),
    FeatureDef {
        key: K::HeightFeet,
        section: S::PersonalInformation,
        form_label: "Height (feet)",
        prompt_label: None,
        kind: FeatureKind::Decimal,
        none_sentinel: false,
        gated_by: None,
        options: &[],
    },
    text(
        K::BodyType,
        S::BodyAndFace,
        "Body Type",
        "Body type",
        &[
            "Slim/lean",
            "Athletic/medium",
            "Muscular",
            "Stocky",
            "Pear/Triangle",
            "Inverted Triangle",
            "Rectangle/Straight",
            "Hourglass",
            "Apple/Round",
        ],
    ),
    text(
        K::HeadShape,
        S::BodyAndFace,
        "Head Shape",
        "Face shape",
        &["Oval", "Round", "Square", "Rectangular", "Diamond", "Heart"],
    ),
    text(
        K::ChinShape,
        S::BodyAndFace,
        "Chin Shape",
        "Chin",
        &[
            "Cleft chin",
            "Double chin",
            "Protruding chin",
            "Square chin",
            "Round chin",
            "Pointed chin",
        ],
    ),
    text(K::HairLength, S::Hair, "Length", "Hair length", &["Bald", "Short", "Medium", "Long"]),
    text(
        K::HairTexture,
        S::Hair,
        "Texture",
        "Hair texture",
        &["Coarse", "Wavy", "Straight", "Rough", "Curly"],
    ),
    text(K::HairStyle, S::Hair, "Style", "Hair style", &[]),
    text(
        K::HairlineShape,
        S::Hair,
        "Hairline",
        "Hairline",
        &["Receding", "Straight", "Widow's peak", "M-shaped"],
    ),
    with_sentinel(text(
        K::FacialHairType,
        S::FacialHair,
        "Type",
        "Facial hair",
        &["None", "Full beard", "Goatee", "Mustache", "Sideburns"],
    )),
    gated(
        text(
            K::BeardColor,
            S::FacialHair,
            "Color",
            "Beard color",
            &["Black", "Dark brown", "Light brown", "Gray", "White"],
        ),
        K::FacialHairType,
    ),
    text(
        K::EyebrowType,
        S::Eyes,
        "Eyebrow Type",
        "Eyebrows",
        &["Straight", "Arched", "Thick", "Thin"],
    ),
    text(K::EyeShape, S::Eyes, "Eye Shape", "Eye shape", &["Almond", "Round", "Hooded", "Deep-set"]),
    text(
        K::EyeColor,
        S::Eyes,
        "Eye Color",
        "Eye color",
        &["Brown", "Blue", "Green", "Hazel", "Gray"],
    ),
    text(
        K::EyeSizeSpacing,
        S::Eyes,
        "Eye Size & Spacing",
        "Eye size",
        &["Large", "Medium", "Small", "Wide-set", "Close-set"],
    ),
    text(
        K::EyelidType,
        S::Eyes,
        "Eyelid Type",
        "Eyelids",
        &[
            "Double eyelid",
            "Single/monolid",
            "Hooded",
            "Crinkled crease",
            "Deep-set crease",
            "Visible crease",
        ],
    ),
    text(
        K::Eyelashes,
        S::Eyes,
        "Eyelashes",
        "Eyelashes",
        &[
            "Short",
            "Medium",
            "Long",
            "Sparse",
            "Dense",
            "Straight",
            "Curled",
            "Full line",
            "Lower prominent",
        ],
    ),
    with_sentinel(text(
        K::EyeBagsWrinkles,
        S::Eyes,
        "Eye Bags & Wrinkles",
        "Eye features",
        &["None", "Slightly puffy", "Heavy wrinkles"],
    )),
    text(
        K::NoseShape,
        S::Nose,
        "Nose Shape",
        "Nose shape",
        &["Greek", "Roman", "Nubian", "Hawk", "Upturned"],
    ),
    text(K::BridgeHeight, S::Nose, "Bridge Height", "Nose bridge", &["High", "Medium", "Low"]),
    text(
        K::NostrilWidth,
        S::Nose,
        "Nostril Width",
        "Nostrils",
        &["Narrow", "Medium", "Wide", "Flared"],
    ),
    text(
        K::NoseTipShape,
        S::Nose,
        "Nose Tip Shape",
        "Nose tip",
        &[
            "Rounded", "Aquiline", "Pointed", "Bulbous", "Drooping", "Upturned", "Wide", "Narrow",
        ],
    ),
    text(K::LipThickness, S::Mouth, "Lip Thickness", "Lip thickness", &["Thin", "Medium", "Full"]),
    text(
        K::LipShape,
        S::Mouth,
        "Lip Shape",
        "Lip shape",
        &[
            "Straight",
            "Curved",
            "High Cupid's bow",
            "Low Cupid's bow",
            "Angular corners",
            "Rounded corners",
            "Chiseled",
            "Bowless",
            "Even thickness",
        ],
    ),
    text(K::MouthWidth, S::Mouth, "Mouth Width", "Mouth width", &["Narrow", "Medium", "Wide"]),
    text(
        K::SmileType,
        S::Mouth,
        "Smile Type",
        "Expression",
        &["Neutral", "Frown", "Upward curve"],
    ),
    text(K::EarSize, S::Ears, "Ear Size", "Ear size", &["Small", "Medium", "Large"]),
    text(
        K::EarShape,
        S::Ears,
        "Ear Shape",
        "Ear shape",
        &["Round", "Oval", "Heart-shaped", "Pointed", "Flared", "Regular"],
    ),
    text(K::EarLobes, S::Ears, "Ear Lobes", "Ear lobes", &["Attached", "Free"]),
    text(
        K::HelixAntihelix,
        S::Ears,
        "Helix/Antihelix Features",
        "Ear details",
        &["Defined helix", "Soft helix", "Prominent antihelix", "Flat concha"],
    ),
    text(
        K::SkinTone,
        S::SkinAndAccessories,
        "Skin Tone",
        "Skin tone",
        &["Fair", "Light", "Medium", "Olive", "Tan", "Deep"],
    ),
    with_sentinel(text(
        K::OtherSkinFeatures,
        S::SkinAndAccessories,
        "Other Skin Features",
        "Skin features",
        &["Scars", "Blemishes", "Wrinkles", "Freckles", "Birthmarks", "Moles"],
    )),
    text(K::Accessories, S::SkinAndAccessories, "Accessories", "Accessories", &[]),
];

/// Iterate over every schema key in canonical order.
pub fn all_keys() -> impl Iterator<Item = FeatureKey> {
    FEATURE_SCHEMA.iter().map(|def| def.key)
}

/// Iterate over the schema entries that participate in prompts.
pub fn prompt_features() -> impl Iterator<Item = &'static FeatureDef> {
    FEATURE_SCHEMA.iter().filter(|def| def.prompt_label.is_some())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
