use rand::{rngs::StdRng, Rng};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::info;

use super::pools::{FIRST_NAMES_F, FIRST_NAMES_M, LAST_NAMES};
use crate::export::Connection;

/// Candidates to try before falling back to a numbered surname.
const MAX_ATTEMPTS: usize = 50;

const FEMININE_ENDINGS: &[&str] = &["a", "e", "i", "y", "ah", "ie", "na", "la", "ne"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    F,
    M,
}

/// Rough first-name heuristic, used only to keep the fake names' gender mix
/// close to the real one.
pub fn guess_gender(first_name: &str, rng: &mut StdRng) -> Gender {
    let name = first_name.trim().to_lowercase();
    if name.is_empty() {
        return if rng.gen_bool(0.5) { Gender::F } else { Gender::M };
    }
    if FEMININE_ENDINGS.iter().any(|end| name.ends_with(end)) {
        Gender::F
    } else {
        Gender::M
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FakeName {
    pub first_name: String,
    pub last_name: String,
    pub full: String,
}

impl FakeName {
    fn new(first: &str, last: &str) -> Self {
        Self {
            first_name: first.to_string(),
            last_name: last.to_string(),
            full: format!("{} {}", first, last),
        }
    }
}

/// Same normalization `Connection::match_key` applies.
fn name_key(real: &str) -> String {
    real.trim().to_lowercase()
}

/// Independent first and last name draws.
fn random_pair(firsts: &[&str], rng: &mut StdRng) -> FakeName {
    FakeName::new(
        firsts[rng.gen_range(0..firsts.len())],
        LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())],
    )
}

fn hash_fake(seed: &str) -> FakeName {
    let h = u128::from_be_bytes(md5::compute(seed.as_bytes()).0);
    let firsts: Vec<&str> = FIRST_NAMES_F.iter().chain(FIRST_NAMES_M).copied().collect();
    FakeName::new(
        firsts[(h % firsts.len() as u128) as usize],
        LAST_NAMES[((h >> 8) % LAST_NAMES.len() as u128) as usize],
    )
}

/// Deterministic fake derived from the MD5 of `real`.
pub fn hash_to_name(real: &str) -> String {
    hash_fake(real).full
}

/// Real name → fake name, keyed case-insensitively. One-to-one within a run:
/// names equal after trimming and lowercasing map to the same fake, and no
/// two distinct names share a fake, whether they came from the connection
/// list or were resolved later.
#[derive(Debug, Clone, Default)]
pub struct NameMap {
    map: HashMap<String, FakeName>,
    /// Lowercased fakes already handed out.
    used: HashSet<String>,
}

impl NameMap {
    pub fn build(connections: &[Connection], rng: &mut StdRng) -> Self {
        let mut names = Self::default();
        for conn in connections {
            let key = conn.match_key();
            if key.is_empty() || names.map.contains_key(&key) {
                continue;
            }
            let firsts = match guess_gender(&conn.first_name, rng) {
                Gender::F => FIRST_NAMES_F,
                Gender::M => FIRST_NAMES_M,
            };
            names.claim(key, |_| random_pair(firsts, rng));
        }

        info!(names = names.len(), "built name map");
        names
    }

    fn is_used(&self, full: &str) -> bool {
        self.used.contains(&full.to_lowercase())
    }

    /// First free candidate from `draw`; after `MAX_ATTEMPTS` collisions the
    /// first candidate's surname is numbered until it is free.
    fn claim(&mut self, key: String, mut draw: impl FnMut(usize) -> FakeName) -> FakeName {
        let base = draw(0);
        let fake = std::iter::once(base.clone())
            .chain((1..MAX_ATTEMPTS).map(&mut draw))
            .find(|c| !self.is_used(&c.full))
            .unwrap_or_else(|| self.numbered(&base));

        self.used.insert(fake.full.to_lowercase());
        self.map.insert(key, fake.clone());
        fake
    }

    fn numbered(&self, base: &FakeName) -> FakeName {
        (2u64..)
            .map(|n| FakeName::new(&base.first_name, &format!("{}-{}", base.last_name, n)))
            .find(|c| !self.is_used(&c.full))
            .unwrap_or_else(|| base.clone())
    }

    pub fn get(&self, real: &str) -> Option<&FakeName> {
        self.map.get(&name_key(real))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Fake full name for `real`. Names without an entry get a hash-derived
    /// fake that is recorded, so later lookups agree and no other name can
    /// receive it. Blank input is returned unchanged.
    pub fn resolve(&mut self, real: &str) -> String {
        let key = name_key(real);
        if key.is_empty() {
            return real.to_string();
        }
        if let Some(f) = self.map.get(&key) {
            return f.full.clone();
        }
        let fake = self.claim(key.clone(), |n| match n {
            0 => hash_fake(&key),
            n => hash_fake(&format!("{}#{}", key, n)),
        });
        fake.full
    }

    pub fn fakes(&self) -> impl Iterator<Item = &FakeName> {
        self.map.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn conn(first: &str, last: &str) -> Connection {
        Connection {
            first_name: first.into(),
            last_name: last.into(),
            ..Default::default()
        }
    }

    #[test]
    fn gender_heuristic() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(guess_gender("Anna", &mut rng), Gender::F);
        assert_eq!(guess_gender("Marie", &mut rng), Gender::F);
        assert_eq!(guess_gender("John", &mut rng), Gender::M);
    }

    #[test]
    fn same_name_maps_once() {
        let mut rng = StdRng::seed_from_u64(42);
        let conns = vec![conn("Ada", "Lovelace"), conn("Bob", "Smith"), conn("Ada", "Lovelace")];
        let names = NameMap::build(&conns, &mut rng);

        assert_eq!(names.len(), 2);
        let ada = names.get("Ada Lovelace").unwrap();
        assert_ne!(ada.full, "Ada Lovelace");
        assert!(FIRST_NAMES_F.contains(&ada.first_name.as_str()));
        assert!(FIRST_NAMES_M.contains(&names.get("Bob Smith").unwrap().first_name.as_str()));
    }

    #[test]
    fn lookups_ignore_case_and_padding() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut names = NameMap::build(&[conn("Ada", "Lovelace")], &mut rng);
        let fake = names.get("Ada Lovelace").unwrap().full.clone();

        assert_eq!(names.get(" ada lovelace ").map(|f| f.full.as_str()), Some(fake.as_str()));
        assert_eq!(names.resolve("ADA LOVELACE"), fake);
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn pool_pairs_are_not_locked_together() {
        let mut rng = StdRng::seed_from_u64(42);
        let conns: Vec<Connection> = (0..200).map(|i| conn("John", &format!("Doe{}", i))).collect();
        let names = NameMap::build(&conns, &mut rng);

        assert_eq!(names.len(), 200);
        let numbered = names.fakes().filter(|f| f.last_name.contains('-')).count();
        assert_eq!(numbered, 0);
    }

    #[test]
    fn mapping_is_injective_even_past_pool_size() {
        let mut rng = StdRng::seed_from_u64(42);
        // all feminine-ending first names so every draw comes from one pool
        let conns: Vec<Connection> = (0..3000)
            .map(|i| conn("Anna", &format!("Person{}", i)))
            .collect();
        let names = NameMap::build(&conns, &mut rng);

        assert_eq!(names.len(), 3000);
        let fakes: HashSet<&str> = names.fakes().map(|f| f.full.as_str()).collect();
        assert_eq!(fakes.len(), 3000);
    }

    #[test]
    fn resolved_strangers_never_take_a_connection_fake() {
        let mut rng = StdRng::seed_from_u64(42);
        let conns: Vec<Connection> = (0..40).map(|i| conn("Sam", &format!("Known{}", i))).collect();
        let mut names = NameMap::build(&conns, &mut rng);
        let known: HashSet<String> = names.fakes().map(|f| f.full.to_lowercase()).collect();

        let strangers: Vec<String> = (0..2000)
            .map(|i| names.resolve(&format!("Stranger{} Outside", i)))
            .collect();

        let distinct: HashSet<String> = strangers.iter().map(|s| s.to_lowercase()).collect();
        assert_eq!(distinct.len(), 2000);
        assert!(distinct.is_disjoint(&known));
        // stable on repeat
        assert_eq!(names.resolve("Stranger7 Outside"), strangers[7]);
        assert_eq!(names.len(), 2040);
    }

    #[test]
    fn deterministic_for_seed() {
        let conns = vec![conn("Ada", "Lovelace"), conn("Alan", "Turing")];
        let a = NameMap::build(&conns, &mut StdRng::seed_from_u64(7));
        let b = NameMap::build(&conns, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.get("Alan Turing"), b.get("Alan Turing"));
    }

    #[test]
    fn blank_names_are_not_mapped() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut names = NameMap::build(&[conn(" ", "")], &mut rng);
        assert!(names.is_empty());
        assert_eq!(names.resolve("  "), "  ");
        assert!(names.is_empty());
    }

    #[test]
    fn hashed_names_are_stable() {
        assert_eq!(hash_to_name("Grace Hopper"), hash_to_name("Grace Hopper"));
        let fake = hash_to_name("Grace Hopper");
        let mut parts = fake.split(' ');
        let first = parts.next().unwrap();
        assert!(FIRST_NAMES_F.contains(&first) || FIRST_NAMES_M.contains(&first));
        assert!(LAST_NAMES.contains(&parts.next().unwrap()));
    }
}
