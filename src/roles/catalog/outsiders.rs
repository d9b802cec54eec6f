use crate::core::RoleType;
use crate::roles::definition::{ActionTag, RoleDefinition};
use crate::roles::handlers;

use super::{at, info, manual, one_other};

fn outsider(id: &'static str, name: &'static str, ability: &'static str) -> RoleDefinition {
    RoleDefinition::new(id, name, RoleType::Outsider).with_ability(ability)
}

pub(super) fn roles() -> Vec<RoleDefinition> {
    let butler = |order| {
        at(order, ActionTag::Mark)
            .with_targets(one_other())
            .with_instruction("Choose a player (not yourself) as your master.")
            .with_handler(handlers::butler)
            .working_while_impaired()
    };

    vec![
        outsider("butler", "Butler", "Each night, choose a player (not yourself): tomorrow, you may only vote if they are voting too.")
            .with_first_night(butler(46))
            .with_other_nights(butler(66)),
        outsider("drunk", "Drunk", "You do not know you are the Drunk. You think you are a Townsfolk character, but you are not."),
        outsider("recluse", "Recluse", "You might register as evil & as a Minion or Demon, even if dead."),
        outsider("saint", "Saint", "If you die by execution, your team loses."),
        outsider("tinker", "Tinker", "You might die at any time.")
            .with_other_nights(manual(52, "The Tinker may die tonight.")),
        outsider("moonchild", "Moonchild", "When you learn that you died, publicly choose 1 alive player. Tonight, if it was a good player, they die."),
        outsider("goon", "Goon", "Each night, the 1st player to choose you with their ability is drunk until dusk. You become their alignment."),
        outsider("lunatic", "Lunatic", "You think you are a Demon, but you are not. The Demon knows who you are & who you choose at night.")
            .with_first_night(manual(13, "Show the Lunatic their fake Minions."))
            .with_other_nights(manual(28, "Record whom the Lunatic attacks; tell the Demon.")),
        outsider("mutant", "Mutant", "If you are \"mad\" about being an Outsider, you might be executed."),
        outsider("sweetheart", "Sweetheart", "When you die, 1 player is drunk from now on."),
        outsider("barber", "Barber", "If you died today or tonight, the Demon may choose 2 players (not another Demon) to swap characters.")
            .with_other_nights(manual(54, "If the Barber died, the Demon may swap two characters.")),
        outsider("klutz", "Klutz", "When you learn that you died, publicly choose 1 alive player: if they are evil, your team loses."),
        outsider("damsel", "Damsel", "All Minions know a Damsel is in play. If a Minion publicly guesses you (once), your team loses.")
            .with_first_night(info(11, "Tell the Minions a Damsel is in play.")),
        outsider("snitch", "Snitch", "Each Minion gets 3 bluffs.")
            .with_first_night(info(10, "Show each Minion three bluffs.")),
        outsider("ogre", "Ogre", "On your 1st night, choose a player (not yourself): you become their alignment (you don't know which) even if drunk or poisoned.")
            .with_first_night(
                at(60, ActionTag::Mark)
                    .with_targets(one_other())
                    .with_instruction("Choose a player (not yourself).")
                    .working_while_impaired(),
            ),
        outsider("hatter", "Hatter", "If you died today or tonight, the Minion & Demon players may choose new Minion & Demon characters.")
            .with_other_nights(manual(4, "If the Hatter died, the evil team may choose new characters.")),
        outsider("plague_doctor", "Plague Doctor", "When you die, the Storyteller gains a Minion ability.")
            .with_other_nights(manual(58, "The Storyteller uses the gained Minion ability.")),
        outsider("heretic", "Heretic", "Whoever wins, loses & whoever loses, wins, even if you are dead."),
        outsider("politician", "Politician", "If you were the player most responsible for your team losing, you change alignment & win, even if dead."),
    ]
}
