use crate::core::{Capability, RoleType};
use crate::roles::definition::{ActionTag, NightAction, RoleDefinition};
use crate::roles::handlers;
use crate::roles::targeting::TargetSpec;

use super::{at, info, manual, one_alive};

fn demon(id: &'static str, name: &'static str, ability: &'static str) -> RoleDefinition {
    RoleDefinition::new(id, name, RoleType::Demon).with_ability(ability)
}

/// First-night wake: learn the Minions and three bluffs.
fn learns_minions() -> NightAction {
    info(14, "Show the Minions and three not-in-play characters.")
}

/// Choose one player to die.
fn kill(order: i32) -> NightAction {
    at(order, ActionTag::Kill)
        .with_targets(one_alive())
        .with_instruction("Choose a player to kill.")
        .with_handler(handlers::demon_kill)
}

pub(super) fn roles() -> Vec<RoleDefinition> {
    let pukka = |order| {
        at(order, ActionTag::Poison)
            .with_targets(TargetSpec::exactly(1).alive().not_self())
            .with_instruction("Choose a player to poison; they die tomorrow night.")
            .with_handler(handlers::pukka)
    };

    vec![
        demon("imp", "Imp", "Each night*, choose a player: they die. If you kill yourself this way, a Minion becomes the Imp.")
            .with_first_night(learns_minions())
            .with_other_nights(kill(33)),
        demon("zombuul", "Zombuul", "Each night*, if no-one died today, choose a player: they die. The 1st time you die, you live but register as dead.")
            .with_first_night(learns_minions())
            .with_other_nights(
                at(34, ActionTag::KillOrSkip)
                    .with_targets(TargetSpec::up_to(1).alive())
                    .with_instruction("If no one died today, choose a player to kill.")
                    .with_handler(handlers::zombuul),
            )
            .granting(Capability::FakeDeath),
        demon("pukka", "Pukka", "Each night, choose a player: they are poisoned. The previously poisoned player dies then becomes healthy.")
            .with_first_night(pukka(36))
            .with_other_nights(pukka(35)),
        demon("shabaloth", "Shabaloth", "Each night*, choose 2 players: they die. A dead player you chose last night might be regurgitated.")
            .with_first_night(learns_minions())
            .with_other_nights(
                at(36, ActionTag::Kill)
                    .with_targets(TargetSpec::exactly(2).alive().distinct())
                    .with_instruction("Choose 2 players to kill.")
                    .with_handler(handlers::demon_kill),
            ),
        demon("po", "Po", "Each night*, you may choose a player: they die. If your last choice was no-one, choose 3 players tonight.")
            .with_first_night(learns_minions())
            .with_other_nights(
                at(37, ActionTag::KillOrSkip)
                    .with_targets(TargetSpec::up_to(3).alive().distinct().custom(handlers::po_targets))
                    .with_instruction("Choose a player to kill, or no one (then three next time).")
                    .with_handler(handlers::po),
            ),
        demon("fang_gu", "Fang Gu", "Each night*, choose a player: they die. The 1st Outsider this kills becomes an evil Fang Gu & you die instead. [+1 Outsider]")
            .with_first_night(learns_minions())
            .with_other_nights(kill(38))
            .granting(Capability::FangGuLeap),
        demon("no_dashii", "No Dashii", "Each night*, choose a player: they die. Your 2 Townsfolk neighbours are poisoned.")
            .with_first_night(learns_minions())
            .with_other_nights(kill(39)),
        demon("vortox", "Vortox", "Each night*, choose a player: they die. Townsfolk abilities yield false info. Each day, if no-one is executed, evil wins.")
            .with_first_night(learns_minions())
            .with_other_nights(kill(40)),
        demon("vigormortis", "Vigormortis", "Each night*, choose a player: they die. Minions you kill keep their ability & poison 1 Townsfolk neighbour. [-1 Outsider]")
            .with_first_night(learns_minions())
            .with_other_nights(kill(41)),
        // Other editions, ordered by the global tables
        demon("lord_of_typhon", "Lord of Typhon", "Each night*, choose a player: they die. Evil characters are in a line. You are in the middle. [+1 Minion. -? to +? Outsiders]")
            .with_first_night(info(1, "Show the evil line."))
            .with_other_nights(kill(43)),
        demon("kazali", "Kazali", "Each night*, choose a player: they die. [You choose which players are which Minions. -? to +? Outsiders]")
            .with_first_night(manual(8, "Choose which players are which Minions."))
            .with_other_nights(kill(48)),
        demon("lil_monsta", "Lil' Monsta", "Each night, Minions choose who babysits Lil' Monsta & \"is the Demon\". Each night*, a player might die. [+1 Minion]")
            .with_first_night(manual(19, "The Minions choose who babysits Lil' Monsta."))
            .with_other_nights(manual(46, "The Minions choose a babysitter; a player might die.")),
        demon("lleech", "Lleech", "Each night*, choose a player: they die. You start by choosing a player: they are poisoned. You die if & only if they are dead.")
            .with_first_night(
                manual(20, "Choose a host: they are poisoned.")
                    .with_targets(TargetSpec::exactly(1).alive().not_self()),
            )
            .with_other_nights(kill(45)),
        demon("yaggababble", "Yaggababble", "You start knowing a secret phrase. For each time you said it publicly today, a player might die.")
            .with_first_night(info(37, "Show the secret phrase."))
            .with_other_nights(manual(47, "For each time the phrase was said, a player might die.")),
        demon("al_hadikhia", "Al-Hadikhia", "Each night*, you may choose 3 players (all players learn who): each silently chooses to live or die, but if all live, all die.")
            .with_first_night(learns_minions())
            .with_other_nights(manual(44, "Choose 3 players.").with_targets(TargetSpec::up_to(3).distinct())),
        demon("ojo", "Ojo", "Each night*, choose a character: they die. If they are not in play, the Storyteller chooses who dies.")
            .with_first_night(learns_minions())
            .with_other_nights(manual(42, "Choose a character to kill.")),
        demon("leviathan", "Leviathan", "If more than 1 good player is executed, evil wins. All players know you are in play. After day 5, evil wins.")
            .with_first_night(info(66, "Announce the Leviathan."))
            .with_other_nights(info(85, "Track the day count.")),
        demon("legion", "Legion", "Each night*, a player might die. Executions fail if only evil voted. You register as a Minion too. [Most players are Legion]")
            .with_other_nights(manual(32, "A Legion player may kill.")),
        demon("riot", "Riot", "On day 3, Minions become Riot & nominees die but nominate an alive player immediately. This must happen."),
    ]
}
