//! Built-in skills, items and rosters

use std::collections::BTreeMap;

use super::{Element, Faction, Item, ItemEffect, Skill, TargetMode, UnitTemplate};

fn skill(id: &str, name: &str, cost: i32, element: Element, power: i32, target: TargetMode) -> Skill {
    Skill {
        id: id.to_string(),
        name: name.to_string(),
        cost,
        element,
        power,
        target,
    }
}

pub(super) fn skills() -> Vec<Skill> {
    use Element::*;
    use TargetMode::*;

    vec![
        skill("CLEAVE", "Cleave", 0, Phys, 30, Single),
        skill("AGI", "Agi", 4, Fire, 50, Single),
        skill("BUFU", "Bufu", 4, Ice, 50, Single),
        skill("ZIO", "Zio", 4, Elec, 50, Single),
        skill("GARU", "Garu", 4, Wind, 50, Single),
        skill("MAZIODYNE", "Maziodyne", 12, Elec, 80, All),
        skill("DIA", "Dia", 3, Phys, -50, Single),
        skill("BASH", "Bash", 5, Phys, 40, Single),
        skill("MEDITRA", "Media", 10, Heal, -50, All),
    ]
}

pub(super) fn items() -> Vec<Item> {
    vec![
        Item {
            id: "MEDICINE".to_string(),
            name: "Medicine".to_string(),
            description: "Restores 100 HP to 1 ally".to_string(),
            effect: ItemEffect::Heal { amount: 100 },
            target: TargetMode::Single,
        },
        Item {
            id: "SNUFF_SOUL".to_string(),
            name: "Snuff Soul".to_string(),
            description: "Restores 50 SP to 1 ally".to_string(),
            effect: ItemEffect::Sp { amount: 50 },
            target: TargetMode::Single,
        },
        Item {
            id: "REVIVAL_BEAD".to_string(),
            name: "Revival Bead".to_string(),
            description: "Revives ally with 50% HP".to_string(),
            effect: ItemEffect::Revive { fraction: 0.5 },
            target: TargetMode::Single,
        },
    ]
}

pub(super) fn initial_inventory() -> BTreeMap<String, u32> {
    BTreeMap::from([
        ("MEDICINE".to_string(), 5),
        ("SNUFF_SOUL".to_string(), 3),
        ("REVIVAL_BEAD".to_string(), 2),
    ])
}

#[allow(clippy::too_many_arguments)]
fn unit(
    id: &str,
    name: &str,
    faction: Faction,
    hp: i32,
    sp: i32,
    weaknesses: &[Element],
    resistances: &[Element],
    skills: &[&str],
    color: &str,
    portrait: &str,
) -> UnitTemplate {
    UnitTemplate {
        id: id.to_string(),
        name: name.to_string(),
        faction,
        max_hp: hp,
        max_sp: sp,
        weaknesses: weaknesses.to_vec(),
        resistances: resistances.to_vec(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        color: color.to_string(),
        portrait: Some(portrait.to_string()),
    }
}

pub(super) fn heroes() -> Vec<UnitTemplate> {
    use Element::*;
    let hero = Faction::Hero;

    vec![
        unit("hero_1", "Yu", hero, 250, 100, &[Wind], &[Elec], &["CLEAVE", "ZIO", "MAZIODYNE"], "bg-zinc-400", "/assets/Yu.png"),
        unit("hero_2", "Chie", hero, 220, 60, &[Fire], &[Ice], &["CLEAVE", "BUFU"], "bg-green-400", "/assets/Chie.png"),
        unit("hero_3", "Yosuke", hero, 210, 70, &[Elec], &[Wind], &["CLEAVE", "GARU"], "bg-orange-400", "/assets/Yosuke.png"),
        unit("hero_4", "Kanji", hero, 300, 40, &[Wind], &[Elec, Phys], &["BASH", "ZIO"], "bg-yellow-200", "/assets/Kanji.png"),
        unit("hero_5", "Teddie", hero, 190, 90, &[Elec], &[Ice], &["BUFU", "MEDITRA"], "bg-blue-300", "/assets/Teddie.png"),
    ]
}

pub(super) fn enemies() -> Vec<UnitTemplate> {
    use Element::*;
    let enemy = Faction::Enemy;

    vec![
        unit("enemy_1", "Burning Beetle", enemy, 150, 999, &[Ice], &[Fire], &["AGI"], "bg-red-600", "/assets/enemy_1.png"),
        unit("enemy_2", "Voltaic Weights", enemy, 200, 999, &[Wind], &[Elec, Phys], &["ZIO"], "bg-yellow-600", "/assets/enemy_2.png"),
        unit("enemy_3", "Ice Cube", enemy, 180, 999, &[Fire], &[Ice], &["BUFU"], "bg-blue-400", "/assets/enemy_3.png"),
    ]
}
