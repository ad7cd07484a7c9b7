// ABOUTME: Static 200-step evolution table driving level requirements and display
// ABOUTME: Generated once on first access and shared read-only by every component
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::constants::progression::{
    MAX_LEVEL, PROTEIN_BASE_GRAMS, PROTEIN_EXPONENT, SCANS_PER_LEVEL,
};

static EVOLUTION_TABLE: OnceLock<Vec<EvolutionTier>> = OnceLock::new();

const CREATURE_NAMES: [&str; 200] = [
    "Ant", "Shrimp", "Mouse", "Hamster", "Sparrow", "Robin", "Rabbit", "Hare", "Hedgehog",
    "Squirrel", "Pigeon", "Duck", "Chicken", "Cat", "Dog", "Fox", "Otter", "Beaver", "Koala",
    "Sloth", "Badger", "Raccoon", "Monkey", "Lemur", "Goat", "Sheep", "Pig", "Deer", "Gazelle",
    "Zebra", "Donkey", "Pony", "Horse", "Wolf", "Coyote", "Lynx", "Bobcat", "Cheetah",
    "Leopard", "Jaguar", "Panther", "Cougar", "Tiger", "Lion", "Hyena", "Wild Boar", "Ram",
    "Bison", "Ox", "Bull", "Gorilla", "Chimpanzee", "Orangutan", "Bear", "Grizzly",
    "Polar Bear", "Panda", "Walrus", "Seal", "Penguin", "Albatross", "Eagle", "Falcon", "Hawk",
    "Owl", "Vulture", "Stork", "Flamingo", "Swan", "Pelican", "Crocodile", "Alligator",
    "Komodo Dragon", "Python", "Cobra", "Anaconda", "Tortoise", "Sea Turtle", "Octopus",
    "Squid", "Colossal Squid", "Shark", "Great White", "Hammerhead", "Tiger Shark",
    "Manta Ray", "Stingray", "Swordfish", "Marlin", "Tuna", "Dolphin", "Beluga", "Narwhal",
    "Orca", "Humpback Whale", "Blue Whale", "Sperm Whale", "Elephant", "Rhino", "Hippo",
    "Giraffe", "Camel", "Llama", "Alpaca", "Kangaroo", "Wallaby", "Platypus", "Echidna",
    "Tasmanian Devil", "Wombat", "Ostrich", "Emu", "Cassowary", "Moose", "Elk", "Caribou",
    "Reindeer", "Antelope", "Impala", "Wildebeest", "Cape Buffalo", "Yak", "Highland Cow",
    "Brahma Bull", "Golden Eagle", "Harpy Eagle", "Condor", "Snow Leopard", "Clouded Leopard",
    "Black Panther", "Silverback", "Kodiak Bear", "Cave Bear", "Short-Faced Bear",
    "Sabertooth Tiger", "Dire Wolf", "American Lion", "Marsupial Lion", "Thylacoleo",
    "Megalania", "Titanoboa", "Sarcosuchus", "Deinosuchus", "Megalodon", "Basilosaurus",
    "Livyatan", "Woolly Mammoth", "Mastodon", "Giant Ground Sloth", "Glyptodon", "Irish Elk",
    "Elasmotherium", "Sivatherium", "Daeodon", "Andrewsarchus", "Phorusrhacos", "Gastornis",
    "Argentavis", "Quetzalcoatlus", "Pterodactyl", "Dimetrodon", "Gorgonopsid", "Scutosaurus",
    "Edaphosaurus", "Inostrancevia", "Coelophysis", "Plateosaurus", "Dilophosaurus",
    "Ceratosaurus", "Allosaurus", "Spinosaurus", "Giganotosaurus", "Carcharodontosaurus",
    "Utahraptor", "Deinonychus", "Velociraptor", "Troodon", "Therizinosaurus", "Ankylosaurus",
    "Stegosaurus", "Triceratops", "Styracosaurus", "Pachycephalosaurus", "Parasaurolophus",
    "Iguanodon", "Brachiosaurus", "Diplodocus", "Apatosaurus", "Argentinosaurus",
    "Dreadnoughtus", "Carnotaurus", "Albertosaurus", "Tarbosaurus", "Daspletosaurus",
    "Yutyrannus", "Gorgosaurus", "Alioramus", "Nanotyrannus", "Giga-Saurus", "T-Rex King",
];

/// Default icon for creatures without a dedicated one
const FALLBACK_ICON: &str = "fa-dna";

fn icon_for(name: &str) -> &'static str {
    match name {
        "Ant" => "fa-bug",
        "Shrimp" => "fa-shrimp",
        "Mouse" | "Hamster" => "fa-mouse",
        "Sparrow" | "Robin" | "Pigeon" => "fa-dove",
        "Rabbit" | "Hare" => "fa-rabbit",
        "Hedgehog" => "fa-worm",
        "Squirrel" => "fa-squirrel",
        "Duck" => "fa-duck",
        "Chicken" => "fa-egg",
        "Cat" | "Tiger" => "fa-cat",
        "Dog" => "fa-dog",
        "Fox" | "Wolf" => "fa-wolf",
        "Otter" | "Beaver" => "fa-otter",
        "Koala" | "Bear" => "fa-paw",
        "Sloth" => "fa-clock",
        "Lion" => "fa-shield-cat",
        "Komodo Dragon" => "fa-dragon",
        "T-Rex King" => "fa-crown",
        "Woolly Mammoth" => "fa-hippo",
        _ => FALLBACK_ICON,
    }
}

/// Rarity class of a tier, decided by level alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    /// Level 1
    Starter,
    /// Levels 2-20
    Common,
    /// Levels 21-50
    Strong,
    /// Levels 51-100
    Apex,
    /// Levels 101-150
    Legendary,
    /// Levels 151 and up
    Mythic,
}

impl Rarity {
    /// Rarity for a level
    #[must_use]
    pub const fn for_level(level: u32) -> Self {
        match level {
            0 | 1 => Self::Starter,
            2..=20 => Self::Common,
            21..=50 => Self::Strong,
            51..=100 => Self::Apex,
            101..=150 => Self::Legendary,
            _ => Self::Mythic,
        }
    }

    /// Lowercase label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Common => "common",
            Self::Strong => "strong",
            Self::Apex => "apex",
            Self::Legendary => "legendary",
            Self::Mythic => "mythic",
        }
    }
}

impl Display for Rarity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// One step of the evolution table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionTier {
    /// Level this tier represents (1-based)
    pub level: u32,
    /// Creature display name
    pub name: String,
    /// Icon reference
    pub icon: String,
    /// Rarity class
    pub rarity: Rarity,
    /// Cumulative protein grams required
    pub required_protein: u64,
    /// Cumulative scan count required
    pub required_scans: u64,
}

impl EvolutionTier {
    /// Human-readable requirement line
    #[must_use]
    pub fn requirement_text(&self) -> String {
        format!(
            "Requires {}g total protein and {} meals scanned.",
            self.required_protein, self.required_scans
        )
    }
}

/// `floor(30 * level^1.6)`
#[must_use]
pub fn required_protein(level: u32) -> u64 {
    (PROTEIN_BASE_GRAMS * f64::from(level).powf(PROTEIN_EXPONENT)).floor() as u64
}

/// `floor(level * 1.2)`
#[must_use]
pub fn required_scans(level: u32) -> u64 {
    (f64::from(level) * SCANS_PER_LEVEL).floor() as u64
}

fn build_table() -> Vec<EvolutionTier> {
    (1..=MAX_LEVEL)
        .map(|level| {
            let name = CREATURE_NAMES
                .get((level - 1) as usize)
                .map_or_else(|| format!("Ancient Level {level} Beast"), |n| (*n).to_owned());
            EvolutionTier {
                level,
                icon: icon_for(&name).to_owned(),
                name,
                rarity: Rarity::for_level(level),
                required_protein: required_protein(level),
                required_scans: required_scans(level),
            }
        })
        .collect()
}

/// The full immutable table, index `i` holding level `i + 1`
#[must_use]
pub fn evolution_table() -> &'static [EvolutionTier] {
    EVOLUTION_TABLE.get_or_init(build_table)
}

/// Tier for a 1-based level, `None` outside `1..=200`
#[must_use]
pub fn tier(level: u32) -> Option<&'static EvolutionTier> {
    level
        .checked_sub(1)
        .and_then(|index| evolution_table().get(index as usize))
}
