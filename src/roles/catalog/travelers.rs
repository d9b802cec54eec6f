use crate::core::RoleType;
use crate::roles::definition::RoleDefinition;

use super::{manual, one_alive};

fn traveler(id: &'static str, name: &'static str, ability: &'static str) -> RoleDefinition {
    RoleDefinition::new(id, name, RoleType::Traveler).with_ability(ability)
}

pub(super) fn roles() -> Vec<RoleDefinition> {
    vec![
        traveler("scapegoat", "Scapegoat", "If a player of your alignment is executed, you might be executed instead."),
        traveler("gunslinger", "Gunslinger", "Each day, after the 1st vote has been tallied, you may choose a player that voted: they die."),
        traveler("beggar", "Beggar", "You must use a vote token to vote. If a dead player gives you theirs, you learn their alignment. You are sober & healthy."),
        traveler("bureaucrat", "Bureaucrat", "Each night, choose a player (not yourself): their vote counts as 3 votes tomorrow.")
            .with_first_night(manual(2, "Choose a player (not yourself).").with_targets(one_alive().not_self()))
            .with_other_nights(manual(2, "Choose a player (not yourself).").with_targets(one_alive().not_self())),
        traveler("thief", "Thief", "Each night, choose a player (not yourself): their vote counts negatively tomorrow.")
            .with_first_night(manual(2, "Choose a player (not yourself).").with_targets(one_alive().not_self()))
            .with_other_nights(manual(2, "Choose a player (not yourself).").with_targets(one_alive().not_self())),
        traveler("butcher", "Butcher", "Each day, after the 1st execution, you may nominate again."),
        traveler("bone_collector", "Bone Collector", "Once per game, at night, choose a dead player: they regain their ability until dusk.")
            .with_other_nights(manual(2, "Choose a dead player, or shake your head.")),
        traveler("harlot", "Harlot", "Each night*, choose a living player: if they agree, you learn their character, but you both might die.")
            .with_other_nights(manual(2, "Choose a living player.").with_targets(one_alive().not_self())),
        traveler("barista", "Barista", "Each night, until dusk, 1) a player becomes sober, healthy & gets true info, or 2) their ability works twice.")
            .with_other_nights(manual(2, "Choose a player and which effect applies.")),
        traveler("deviant", "Deviant", "If you were funny today, you cannot die by exile."),
        traveler("apprentice", "Apprentice", "On your 1st night, you gain a Townsfolk ability (if good) or a Minion ability (if evil).")
            .with_first_night(manual(2, "Show the ability the Apprentice gains.")),
        traveler("matron", "Matron", "Each day, you may choose up to 3 sets of 2 players to swap seats."),
        traveler("judge", "Judge", "Once per game, if another player nominated, you may choose to force the current execution to pass or fail."),
        traveler("bishop", "Bishop", "Only the Storyteller can nominate. At least 1 opposing player must be nominated each day."),
        traveler("voudon", "Voudon", "Only you & the dead can vote. They don't need a vote token to do so. A 50% majority is not required."),
    ]
}
