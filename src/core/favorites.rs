use crate::domain::model::{CatalogSnapshot, Pet};
use std::collections::HashMap;

/// 以 id 為鍵的收藏集合，與 catalog snapshot 生命週期無關
///
/// 重新整理 catalog 後，已不存在的 id 仍保留在集合中（孤兒收藏），
/// 只是 [`FavoriteSet::list`] 無法為它找到對應的紀錄而略過。
#[derive(Debug, Default, Clone)]
pub struct FavoriteSet {
    // id -> 加入收藏時的序號，用來維持收藏順序
    members: HashMap<String, u64>,
    next_seq: u64,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 不存在則加入、存在則移除，回傳切換後的狀態
    ///
    /// 這是 toggle 而非 set：對同一個 id 呼叫兩次等於沒變。
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.members.remove(id).is_some() {
            tracing::debug!("Removed favorite '{}'", id);
            false
        } else {
            self.members.insert(id.to_string(), self.next_seq);
            self.next_seq += 1;
            tracing::debug!("Added favorite '{}'", id);
            true
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.members.contains_key(id)
    }

    /// 依收藏順序回傳目前 snapshot 中找得到的寵物，孤兒收藏直接略過
    pub fn list(&self, snapshot: &CatalogSnapshot) -> Vec<Pet> {
        let mut resolved: Vec<(u64, &Pet)> = self
            .members
            .iter()
            .filter_map(|(id, &seq)| snapshot.get(id).map(|pet| (seq, pet)))
            .collect();
        resolved.sort_by_key(|(seq, _)| *seq);
        resolved.into_iter().map(|(_, pet)| pet.clone()).collect()
    }

    /// 目前 snapshot 中找不到的收藏 id
    pub fn orphans(&self, snapshot: &CatalogSnapshot) -> Vec<String> {
        let mut orphans: Vec<&String> = self
            .members
            .keys()
            .filter(|id| !snapshot.contains(id))
            .collect();
        orphans.sort();
        orphans.into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Gender, RawProviderPet, Size, Species};

    fn snapshot(keys: &[&str]) -> CatalogSnapshot {
        let pets = keys
            .iter()
            .map(|key| {
                Pet::from_raw(
                    "dog",
                    Species::Dog,
                    RawProviderPet {
                        local_key: key.to_string(),
                        name: key.to_string(),
                        image_url: format!("https://img.test/{}.jpg", key),
                        age: 1,
                        gender: Gender::Male,
                        size: Size::Small,
                    },
                )
            })
            .collect();
        CatalogSnapshot::new(pets, vec![])
    }

    #[test]
    fn test_toggle_twice_is_no_op() {
        let mut favorites = FavoriteSet::new();
        assert!(favorites.toggle("dog-labrador"));
        assert!(favorites.is_favorite("dog-labrador"));
        assert!(!favorites.toggle("dog-labrador"));
        assert!(!favorites.is_favorite("dog-labrador"));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_toggle_parity() {
        for count in 0..7 {
            let mut favorites = FavoriteSet::new();
            for _ in 0..count {
                favorites.toggle("cat-3");
            }
            assert_eq!(favorites.is_favorite("cat-3"), count % 2 == 1);
            assert!(favorites.len() <= 1);
        }
    }

    #[test]
    fn test_list_follows_favorite_order() {
        let current = snapshot(&["pug", "akita", "boxer"]);
        let mut favorites = FavoriteSet::new();
        favorites.toggle("dog-boxer");
        favorites.toggle("dog-pug");
        favorites.toggle("dog-akita");
        favorites.toggle("dog-boxer");
        favorites.toggle("dog-boxer");

        let ids: Vec<String> = favorites
            .list(&current)
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        assert_eq!(ids, vec!["dog-pug", "dog-akita", "dog-boxer"]);
    }

    #[test]
    fn test_orphan_stays_favorite_but_is_not_listed() {
        let mut favorites = FavoriteSet::new();
        favorites.toggle("dog-labrador");
        favorites.toggle("dog-pug");

        let refreshed = snapshot(&["pug", "akita"]);
        let listed: Vec<String> = favorites
            .list(&refreshed)
            .iter()
            .map(|p| p.id().to_string())
            .collect();

        assert_eq!(listed, vec!["dog-pug"]);
        assert!(favorites.is_favorite("dog-labrador"));
        assert_eq!(favorites.orphans(&refreshed), vec!["dog-labrador"]);
    }

    #[test]
    fn test_list_only_contains_favorites() {
        let current = snapshot(&["pug", "akita", "boxer"]);
        let mut favorites = FavoriteSet::new();
        favorites.toggle("dog-akita");

        for pet in favorites.list(&current) {
            assert!(favorites.is_favorite(pet.id()));
        }
    }
}
