//! Deterministic text generation from curated lists: customer names,
//! cities, and vendor names. Same RNG stream = same text.

use crate::rng::StreamRng;

pub struct NamePool;

impl NamePool {
    /// "First Last" personal name.
    pub fn full_name(rng: &mut StreamRng) -> String {
        format!("{} {}", *rng.pick(FIRST_NAMES), *rng.pick(LAST_NAMES))
    }

    pub fn city(rng: &mut StreamRng) -> &'static str {
        *rng.pick(CITIES)
    }

    /// Vendor company name, e.g. "Hargrove Systems LLC".
    pub fn vendor(rng: &mut StreamRng) -> String {
        format!(
            "{} {} {}",
            *rng.pick(LAST_NAMES),
            *rng.pick(VENDOR_LINES),
            *rng.pick(VENDOR_SUFFIXES)
        )
    }
}

const FIRST_NAMES: &[&str] = &[
    "Ava", "Mia", "Noah", "Liam", "Emma", "Olivia", "Ethan", "Lucas", "Sofia", "Isabella",
    "Mason", "Logan", "Amelia", "Harper", "Elena", "Diego", "Priya", "Ravi", "Wei", "Mei",
    "Omar", "Layla", "Yusuf", "Amara", "Kofi", "Nia", "Hana", "Kenji", "Ingrid", "Lars",
    "Marta", "Pablo", "Lucia", "Mateo", "Camila", "Santiago", "Aisha", "Ibrahim", "Fatima",
    "Tariq", "Chloe", "Nathan", "Grace", "Henry", "Ruby", "Oscar", "Stella", "Felix", "Iris",
    "Hugo", "Clara", "Leo", "Nora", "Max", "Elsa", "Ivan", "Anya", "Dmitri", "Katya", "Sven",
];

const LAST_NAMES: &[&str] = &[
    "Alvarez", "Banerjee", "Carlsson", "Duarte", "Eriksen", "Fontaine", "Grigoriev",
    "Hargrove", "Ivanova", "Jansen", "Kowalski", "Lindqvist", "Moreau", "Nakamura",
    "Okafor", "Petrov", "Quintana", "Rosenberg", "Sato", "Takahashi", "Uddin", "Vargas",
    "Whitfield", "Xiang", "Yamada", "Zielinski", "Abara", "Bergstrom", "Castellano",
    "Dubois", "Eze", "Fischer", "Gallagher", "Huang", "Iqbal", "Jovanovic", "Kimura",
    "Larsson", "Mbeki", "Novak", "Oliveira", "Pappas", "Rahman", "Silva", "Tanaka",
    "Umarov", "Villanueva", "Weber", "Yilmaz", "Zhou",
];

const CITIES: &[&str] = &[
    "New York", "Chicago", "Houston", "Phoenix", "Philadelphia", "San Antonio", "Dallas",
    "Austin", "Columbus", "Charlotte", "Seattle", "Denver", "Boston", "Nashville",
    "Portland", "Atlanta", "Miami", "Minneapolis", "Tampa", "Raleigh",
];

const VENDOR_LINES: &[&str] = &[
    "Consulting", "Systems", "Facilities", "Staffing", "Analytics", "Networks",
    "Security", "Logistics", "Media", "Cloud",
];

const VENDOR_SUFFIXES: &[&str] = &["LLC", "Inc", "Group", "Partners", "Co"];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, TableSlot};

    #[test]
    fn names_are_deterministic() {
        let mut a = RngBank::new(5).for_table(TableSlot::Customer);
        let mut b = RngBank::new(5).for_table(TableSlot::Customer);
        assert_eq!(NamePool::full_name(&mut a), NamePool::full_name(&mut b));
    }

    #[test]
    fn vendor_names_have_three_parts() {
        let mut rng = RngBank::new(5).for_table(TableSlot::Cost);
        for _ in 0..20 {
            let v = NamePool::vendor(&mut rng);
            assert!(v.split_whitespace().count() >= 3, "unexpected vendor: {v}");
        }
    }
}
