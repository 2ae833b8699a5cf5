use crate::domain::model::{CatalogSnapshot, FilterState, Pet, SpeciesFilter};

/// 所有啟用的條件以 AND 組合；保留原本的相對順序
pub fn apply<'a>(snapshot: &'a CatalogSnapshot, filter: &FilterState) -> Vec<&'a Pet> {
    let needle = filter
        .free_text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_lowercase);

    snapshot
        .pets()
        .iter()
        .filter(|pet| matches_species(pet, filter.species))
        .filter(|pet| filter.size.map_or(true, |size| pet.size() == size))
        .filter(|pet| {
            needle
                .as_deref()
                .map_or(true, |needle| matches_text(pet, needle))
        })
        .collect()
}

fn matches_species(pet: &Pet, species: SpeciesFilter) -> bool {
    match species {
        SpeciesFilter::All => true,
        SpeciesFilter::Only(species) => pet.species() == species,
    }
}

/// 名稱包含關鍵字，或關鍵字剛好是物種名稱（"dog"、"cat"）
fn matches_text(pet: &Pet, needle: &str) -> bool {
    pet.name().to_lowercase().contains(needle) || pet.species().as_str().to_lowercase() == needle
}
