use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

const ONSETS: &[&str] = &[
    "al", "b", "c", "d", "h", "k", "m", "n", "p", "r", "s", "t", "v", "z", "gr", "ph", "sh",
];
const VOWELS: &[&str] = &["a", "e", "i", "o", "u", "ae", "ei", "io", "au"];
const MIDDLES: &[&str] = &["l", "r", "n", "d", "g", "t", "rr", "ll", "st"];
const ENDINGS: &[&str] = &[
    "a", "ar", "ion", "is", "on", "ux", "ia", "ea", "ir", "ana", "ope",
];

fn pick<'a>(rng: &mut ChaCha8Rng, options: &'a [&str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn star_name_candidate(rng: &mut ChaCha8Rng) -> String {
    let mut name = String::from(pick(rng, ONSETS));
    name.push_str(pick(rng, VOWELS));
    // Longer names get an extra syllable in the middle.
    if rng.gen_bool(0.6) {
        name.push_str(pick(rng, MIDDLES));
        name.push_str(pick(rng, VOWELS));
    }
    name.push_str(pick(rng, ENDINGS));
    capitalize(&name)
}

/// A pronounceable star name not yet present in `used`.
pub fn star_name(rng: &mut ChaCha8Rng, used: &mut HashSet<String>) -> String {
    let mut candidate = star_name_candidate(rng);
    for _ in 0..200 {
        if used.insert(candidate.clone()) {
            return candidate;
        }
        candidate = star_name_candidate(rng);
    }

    // Tables are exhausted; number the last candidate instead.
    let mut serial = 2;
    loop {
        let numbered = format!("{} {}", candidate, serial);
        if used.insert(numbered.clone()) {
            return numbered;
        }
        serial += 1;
    }
}

/// Planets take lowercase letters after their star, starting at `b`.
pub fn planet_designation(star: &str, index: usize) -> String {
    const LETTERS: &[u8] = b"bcdefghijklmnopqrstuvwxyz";
    match LETTERS.get(index) {
        Some(letter) => format!("{} {}", star, *letter as char),
        None => format!("{} {}", star, index + 2),
    }
}

pub fn roman_numeral(value: usize) -> String {
    const TABLE: &[(usize, &str)] = &[
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut remaining = value;
    let mut out = String::new();
    for (amount, glyph) in TABLE {
        while remaining >= *amount {
            out.push_str(glyph);
            remaining -= amount;
        }
    }
    out
}

/// Moons are numbered from `I` after their planet.
pub fn moon_designation(planet: &str, index: usize) -> String {
    format!("{} {}", planet, roman_numeral(index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn star_names_are_unique_and_capitalized() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut used = HashSet::new();
        for _ in 0..300 {
            let name = star_name(&mut rng, &mut used);
            assert!(name.chars().next().map_or(false, |c| c.is_ascii_uppercase()));
        }
        assert_eq!(used.len(), 300);
    }

    #[test]
    fn star_names_are_deterministic() {
        let mut a = ChaCha8Rng::seed_from_u64(4);
        let mut b = ChaCha8Rng::seed_from_u64(4);
        let names_a: Vec<String> = (0..5).map(|_| star_name(&mut a, &mut HashSet::new())).collect();
        let names_b: Vec<String> = (0..5).map(|_| star_name(&mut b, &mut HashSet::new())).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn designations_are_hierarchical() {
        assert_eq!(planet_designation("Vesta", 0), "Vesta b");
        assert_eq!(planet_designation("Vesta", 2), "Vesta d");
        assert_eq!(planet_designation("Vesta", 30), "Vesta 32");
        assert_eq!(moon_designation("Vesta b", 0), "Vesta b I");
        assert_eq!(moon_designation("Vesta b", 3), "Vesta b IV");
    }

    #[test]
    fn roman_numerals() {
        assert_eq!(roman_numeral(9), "IX");
        assert_eq!(roman_numeral(14), "XIV");
        assert_eq!(roman_numeral(49), "XLIX");
        assert_eq!(roman_numeral(0), "");
    }
}
