use crate::core::{Capability, RoleType};
use crate::roles::definition::{ActionTag, InfoCadence, NightAction, RoleDefinition};
use crate::roles::handlers;
use crate::roles::targeting::TargetSpec;

use super::{at, info, manual, one_alive, one_other};

fn minion(id: &'static str, name: &'static str, ability: &'static str) -> RoleDefinition {
    RoleDefinition::new(id, name, RoleType::Minion).with_ability(ability)
}

/// First-night wake for Minions with nothing else to do: learn the Demon.
fn learns_demon() -> NightAction {
    info(13, "Show the Demon and the other Minions.")
}

pub(super) fn roles() -> Vec<RoleDefinition> {
    let poisoner = |order| {
        at(order, ActionTag::Poison)
            .with_targets(one_alive())
            .with_instruction("Choose a player to poison.")
            .with_handler(handlers::poison)
    };
    let advocate = |order| {
        at(order, ActionTag::Mark)
            .with_targets(one_alive())
            .with_instruction("Choose a living player: they survive execution tomorrow.")
            .with_handler(handlers::devils_advocate)
    };
    let witch = |order| {
        at(order, ActionTag::Mark)
            .with_targets(one_alive())
            .with_instruction("Choose a player to curse.")
            .with_handler(handlers::witch)
    };
    let cerenovus = |order| {
        at(order, ActionTag::Mark)
            .with_targets(one_alive())
            .with_instruction("Choose a player and a good character: they must be mad about it tomorrow.")
            .with_handler(handlers::cerenovus)
    };
    let spy = |order| {
        at(order, ActionTag::Grimoire).with_instruction("Show the Grimoire for as long as needed.")
    };

    vec![
        // Trouble Brewing
        minion("poisoner", "Poisoner", "Each night, choose a player: they are poisoned tonight and tomorrow day.")
            .with_first_night(poisoner(22))
            .with_other_nights(poisoner(11)),
        minion("spy", "Spy", "Each night, you see the Grimoire. You might register as good & as a Townsfolk or Outsider, even if dead.")
            .with_first_night(spy(59))
            .with_other_nights(spy(80)),
        minion("scarlet_woman", "Scarlet Woman", "If there are 5 or more players alive & the Demon dies, you become the Demon.")
            .with_first_night(learns_demon())
            .with_other_nights(info(26, "If you became the Demon today, show the Demon token.")),
        minion("baron", "Baron", "There are extra Outsiders in play. [+2 Outsiders]")
            .with_first_night(learns_demon()),
        // Bad Moon Rising
        minion("godfather", "Godfather", "You start knowing which Outsiders are in play. If 1 died today, choose a player tonight: they die. [-1 or +1 Outsider]")
            .with_first_night(info(27, "Show the Outsiders in play."))
            .with_other_nights(
                at(50, ActionTag::KillOrSkip)
                    .with_targets(TargetSpec::up_to(1).alive())
                    .with_instruction("If an Outsider died today, choose a player to kill.")
                    .with_handler(handlers::godfather),
            )
            .with_info(InfoCadence::Once),
        minion("devils_advocate", "Devil's Advocate", "Each night, choose a living player (different to last night): if executed tomorrow, they don't die.")
            .with_first_night(advocate(29))
            .with_other_nights(advocate(20)),
        minion("assassin", "Assassin", "Once per game, at night*, choose a player: they die, even if for some reason they could not.")
            .with_first_night(learns_demon())
            .with_other_nights(
                at(49, ActionTag::KillOrSkip)
                    .with_targets(TargetSpec::up_to(1))
                    .with_instruction("Choose a player to kill, or shake your head.")
                    .with_handler(handlers::assassin)
                    .requiring(Capability::AssassinKill),
            )
            .granting(Capability::AssassinKill),
        minion("mastermind", "Mastermind", "If the Demon dies by execution (ending the game), play for 1 more day. If a player is then executed, their team loses.")
            .with_first_night(learns_demon()),
        // Sects & Violets
        minion("evil_twin", "Evil Twin", "You & an opposing player know each other. If the good player is executed, evil wins. Good can't win if you both live.")
            .with_first_night(
                at(30, ActionTag::Mark)
                    .with_targets(one_other())
                    .with_instruction("Choose the good twin; show them to each other.")
                    .with_handler(handlers::evil_twin)
                    .working_while_impaired(),
            )
            .granting(Capability::TwinPairing),
        minion("witch", "Witch", "Each night, choose a player: if they nominate tomorrow, they die. If just 3 players live, you lose this ability.")
            .with_first_night(witch(31))
            .with_other_nights(witch(21)),
        minion("cerenovus", "Cerenovus", "Each night, choose a player & a good character: they are \"mad\" they are this character tomorrow, or might be executed.")
            .with_first_night(cerenovus(32))
            .with_other_nights(cerenovus(22)),
        minion("pit_hag", "Pit-Hag", "Each night*, choose a player & a character they become (if not in play). If a Demon is made, deaths tonight are arbitrary.")
            .with_first_night(learns_demon())
            .with_other_nights(
                at(9, ActionTag::Transform)
                    .with_targets(TargetSpec::exactly(1))
                    .with_instruction("Choose a player and a character they become.")
                    .with_role_rule(handlers::pit_hag_choice)
                    .with_handler(handlers::pit_hag),
            ),
        // Other editions, ordered by the global tables
        minion("widow", "Widow", "On your 1st night, look at the Grimoire & choose a player: they are poisoned. 1 good player knows a Widow is in play.")
            .with_first_night(
                at(23, ActionTag::Poison)
                    .with_targets(one_alive())
                    .with_instruction("Look at the Grimoire, then choose a player to poison.")
                    .with_handler(handlers::widow),
            ),
        minion("boffin", "Boffin", "The Demon (even if drunk or poisoned) has a not-in-play good character's ability. You both know which.")
            .with_first_night(manual(3, "Show the Boffin and the Demon the borrowed ability.")),
        minion("summoner", "Summoner", "You get 3 bluffs. On the 3rd night, choose a player: they become an evil Demon of your choice. [No Demon]")
            .with_first_night(manual(12, "Show three bluffs."))
            .with_other_nights(manual(27, "On the third night, choose a player and a Demon.")),
        minion("marionette", "Marionette", "You think you are a good character, but you are not. The Demon knows who you are. [You neighbour the Demon]")
            .with_first_night(manual(15, "Tell the Demon who the Marionette is.")),
        minion("xaan", "Xaan", "On night X, all Townsfolk are poisoned until dusk. [X Outsiders]")
            .with_first_night(manual(21, "If tonight is night X, all Townsfolk are poisoned."))
            .with_other_nights(manual(10, "If tonight is night X, all Townsfolk are poisoned.")),
        minion("wizard", "Wizard", "Once per game, choose to make a wish. If granted, it might have a price & leave a clue as to its nature.")
            .with_first_night(manual(25, "Grant or refuse the wish."))
            .with_other_nights(manual(14, "Grant or refuse the wish.")),
        minion("organ_grinder", "Organ Grinder", "All players keep their eyes closed when voting and the vote tally is secret. Each night, choose if you are drunk until dusk.")
            .with_first_night(manual(28, "Choose whether you are drunk until dusk."))
            .with_other_nights(manual(19, "Choose whether you are drunk until dusk.")),
        minion("fearmonger", "Fearmonger", "Each night, choose a player: if you nominate & execute them, their team loses. All players know if you choose a new player.")
            .with_first_night(manual(33, "Choose a player.").with_targets(one_other()))
            .with_other_nights(manual(23, "Choose a player.").with_targets(one_other())),
        minion("harpy", "Harpy", "Each night, choose 2 players: tomorrow, the 1st player is mad that the 2nd is evil, or one or both might die.")
            .with_first_night(manual(34, "Choose 2 players.").with_targets(TargetSpec::exactly(2).alive().distinct()))
            .with_other_nights(manual(24, "Choose 2 players.").with_targets(TargetSpec::exactly(2).alive().distinct())),
        minion("mezepheles", "Mezepheles", "You start knowing a secret word. The 1st good player to say this word becomes evil that night.")
            .with_first_night(info(35, "Show the secret word."))
            .with_other_nights(manual(25, "If a good player said the word, they turn evil.")),
        minion("vizier", "Vizier", "All players know you are the Vizier. You cannot die during the day. If good voted, you may choose to execute immediately.")
            .with_first_night(info(67, "Announce the Vizier.")),
        minion("wraith", "Wraith", "You may choose to open your eyes at night. You wake when other evil players do.")
            .with_first_night(manual(2, "The Wraith may open their eyes."))
            .with_other_nights(manual(1, "The Wraith may open their eyes.")),
    ]
}
