use crate::utils::error::PetError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Dog,
    Cat,
}

impl Species {
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "Dog",
            Species::Cat => "Cat",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Species::Dog => "🐶",
            Species::Cat => "🐱",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = PetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dog" | "dogs" => Ok(Species::Dog),
            "cat" | "cats" => Ok(Species::Cat),
            other => Err(PetError::ValidationError {
                message: format!("unknown species '{}' (expected dog or cat)", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
        };
        f.write_str(label)
    }
}

impl FromStr for Size {
    type Err = PetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Size::Small),
            "medium" => Ok(Size::Medium),
            "large" => Ok(Size::Large),
            other => Err(PetError::ValidationError {
                message: format!("unknown size '{}' (expected small, medium or large)", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => f.write_str("Male"),
            Gender::Female => f.write_str("Female"),
        }
    }
}

/// Provider adapter 產出的中繼資料，尚未指派全域 id
///
/// `age`、`gender`、`size` 為展示用的合成值，上游沒有這些欄位，不代表真實的動物資訊。
#[derive(Debug, Clone, PartialEq)]
pub struct RawProviderPet {
    pub local_key: String,
    pub name: String,
    pub image_url: String,
    pub age: u8,
    pub gender: Gender,
    pub size: Size,
}

/// 正規化後的寵物紀錄，建立後不可變
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    id: String,
    name: String,
    species: Species,
    image_url: String,
    age: u8,
    gender: Gender,
    size: Size,
}

impl Pet {
    /// 以 `"{provenance}-{local_key}"` 組出 id
    pub fn from_raw(provenance: &str, species: Species, raw: RawProviderPet) -> Self {
        Self {
            id: format!("{}-{}", provenance, raw.local_key),
            name: raw.name,
            species,
            image_url: raw.image_url,
            age: raw.age,
            gender: raw.gender,
            size: raw.size,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// 分享用的一段文字，附上圖片連結
    pub fn share_message(&self) -> String {
        format!(
            "Check out this adorable {} named {} available for adoption! {}",
            self.species, self.name, self.image_url
        )
    }
}

/// 一次 refresh 的完整結果
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pets: Vec<Pet>,
    index: HashMap<String, usize>,
    fetched_at: DateTime<Utc>,
    failed_providers: Vec<String>,
}

impl CatalogSnapshot {
    /// 呼叫端需保證 id 唯一；重複的 id 只索引第一筆
    pub fn new(pets: Vec<Pet>, failed_providers: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(pets.len());
        for (position, pet) in pets.iter().enumerate() {
            index.entry(pet.id.clone()).or_insert(position);
        }

        Self {
            pets,
            index,
            fetched_at: Utc::now(),
            failed_providers,
        }
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn get(&self, id: &str) -> Option<&Pet> {
        self.index.get(id).map(|&position| &self.pets[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// 本次 refresh 中失敗的來源（部分失敗）
    pub fn failed_providers(&self) -> &[String] {
        &self.failed_providers
    }

    pub fn is_partial(&self) -> bool {
        !self.failed_providers.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeciesFilter {
    #[default]
    All,
    Only(Species),
}

impl FromStr for SpeciesFilter {
    type Err = PetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(SpeciesFilter::All)
        } else {
            s.parse().map(SpeciesFilter::Only)
        }
    }
}

/// 篩選條件，由展示層持有，每次查詢時傳入
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub species: SpeciesFilter,
    pub size: Option<Size>,
    pub free_text: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_species(mut self, species: Species) -> Self {
        self.species = SpeciesFilter::Only(species);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_free_text(mut self, text: impl Into<String>) -> Self {
        self.free_text = Some(text.into());
        self
    }

    pub fn is_pass_through(&self) -> bool {
        self.species == SpeciesFilter::All
            && self.size.is_none()
            && self
                .free_text
                .as_deref()
                .map(|t| t.trim().is_empty())
                .unwrap_or(true)
    }
}
