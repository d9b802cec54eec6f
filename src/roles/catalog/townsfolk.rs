use crate::core::{Capability, RoleType};
use crate::roles::definition::{ActionTag, InfoCadence, RoleDefinition};
use crate::roles::handlers;
use crate::roles::targeting::TargetSpec;

use super::{at, info, manual, one_alive, one_other};

fn townsfolk(id: &'static str, name: &'static str, ability: &'static str) -> RoleDefinition {
    RoleDefinition::new(id, name, RoleType::Townsfolk).with_ability(ability)
}

pub(super) fn roles() -> Vec<RoleDefinition> {
    vec![
        // Trouble Brewing
        townsfolk("washerwoman", "Washerwoman", "You start knowing that 1 of 2 players is a particular Townsfolk.")
            .with_first_night(info(40, "Show the Townsfolk token and point to two players."))
            .with_info(InfoCadence::Once),
        townsfolk("librarian", "Librarian", "You start knowing that 1 of 2 players is a particular Outsider. (Or that zero are in play.)")
            .with_first_night(info(41, "Show the Outsider token and point to two players."))
            .with_info(InfoCadence::Once),
        townsfolk("investigator", "Investigator", "You start knowing that 1 of 2 players is a particular Minion.")
            .with_first_night(info(42, "Show the Minion token and point to two players."))
            .with_info(InfoCadence::Once),
        townsfolk("chef", "Chef", "You start knowing how many pairs of evil players there are.")
            .with_first_night(info(43, "Show the number of evil pairs."))
            .with_info(InfoCadence::Once),
        townsfolk("empath", "Empath", "Each night, you learn how many of your 2 alive neighbours are evil.")
            .with_first_night(info(44, "Show how many alive neighbours are evil."))
            .with_other_nights(info(64, "Show how many alive neighbours are evil."))
            .with_info(InfoCadence::EveryNight),
        townsfolk("fortune_teller", "Fortune Teller", "Each night, choose 2 players: you learn if either is a Demon. There is a good player that registers as a Demon to you.")
            .with_first_night(
                at(45, ActionTag::Inspect)
                    .with_targets(TargetSpec::exactly(2).distinct())
                    .with_instruction("Choose 2 players."),
            )
            .with_other_nights(
                at(65, ActionTag::Inspect)
                    .with_targets(TargetSpec::exactly(2).distinct())
                    .with_instruction("Choose 2 players."),
            )
            .with_info(InfoCadence::EveryNight),
        townsfolk("undertaker", "Undertaker", "Each night*, you learn which character died by execution today.")
            .with_other_nights(info(67, "Show the character executed today."))
            .with_info(InfoCadence::EveryNight),
        townsfolk("monk", "Monk", "Each night*, choose a player (not yourself): they are safe from the Demon tonight.")
            .with_other_nights(
                at(18, ActionTag::Protect)
                    .with_targets(one_other())
                    .with_instruction("Choose a player (not yourself): they are safe from the Demon tonight.")
                    .with_handler(handlers::protect),
            ),
        townsfolk("ravenkeeper", "Ravenkeeper", "If you die at night, you are woken to choose a player: you learn their character.")
            .with_other_nights(
                at(56, ActionTag::InspectDeath)
                    .with_targets(TargetSpec::exactly(1))
                    .with_instruction("You died tonight. Choose a player to learn their character.")
                    .only_if_died_tonight(),
            )
            .with_info(InfoCadence::Once)
            .waking_when_dead(),
        townsfolk("virgin", "Virgin", "The 1st time you are nominated, if the nominator is a Townsfolk, they are executed immediately.")
            .granting(Capability::VirginNomination),
        townsfolk("slayer", "Slayer", "Once per game, during the day, publicly choose a player: if they are the Demon, they die.")
            .granting(Capability::SlayerShot),
        townsfolk("soldier", "Soldier", "You are safe from the Demon."),
        townsfolk("mayor", "Mayor", "If only 3 players live & no execution occurs, your team wins. If you die at night, another player might die instead."),
        // Bad Moon Rising
        townsfolk("grandmother", "Grandmother", "You start knowing a good player & their character. If the Demon kills them, you die too.")
            .with_first_night(info(47, "Point to the grandchild and show their character."))
            .with_info(InfoCadence::Once),
        townsfolk("sailor", "Sailor", "Each night, choose an alive player: either you or they are drunk until dusk. You can't die.")
            .with_first_night(
                at(16, ActionTag::Poison)
                    .with_targets(one_other())
                    .with_instruction("Choose an alive player to drink with.")
                    .with_handler(handlers::sailor),
            )
            .with_other_nights(
                at(6, ActionTag::Poison)
                    .with_targets(one_other())
                    .with_instruction("Choose an alive player to drink with.")
                    .with_handler(handlers::sailor),
            ),
        townsfolk("chambermaid", "Chambermaid", "Each night, choose 2 alive players (not yourself): you learn how many woke tonight due to their ability.")
            .with_first_night(
                at(64, ActionTag::Inspect)
                    .with_targets(TargetSpec::exactly(2).alive().not_self().distinct())
                    .with_instruction("Choose 2 alive players (not yourself)."),
            )
            .with_other_nights(
                at(83, ActionTag::Inspect)
                    .with_targets(TargetSpec::exactly(2).alive().not_self().distinct())
                    .with_instruction("Choose 2 alive players (not yourself)."),
            )
            .with_info(InfoCadence::EveryNight),
        townsfolk("exorcist", "Exorcist", "Each night*, choose a player (different to last night): the Demon, if chosen, learns who you are then doesn't wake tonight.")
            .with_other_nights(
                at(29, ActionTag::Mark)
                    .with_targets(one_other())
                    .with_instruction("Choose a player.")
                    .with_handler(handlers::exorcist),
            ),
        townsfolk("innkeeper", "Innkeeper", "Each night*, choose 2 players: they can't be killed tonight, but 1 is drunk until dusk.")
            .with_other_nights(
                at(12, ActionTag::Protect)
                    .with_targets(TargetSpec::exactly(2).distinct())
                    .with_instruction("Choose 2 players: they can't die tonight, but 1 is drunk.")
                    .with_handler(handlers::innkeeper),
            ),
        townsfolk("gambler", "Gambler", "Each night*, choose a player & guess their character: if you guess wrong, you die.")
            .with_other_nights(
                at(15, ActionTag::Inspect)
                    .with_targets(one_other())
                    .with_instruction("Choose a player and guess their character.")
                    .with_handler(handlers::gambler),
            ),
        townsfolk("gossip", "Gossip", "Each day, you may make a public statement. Tonight, if it was true, a player dies.")
            .with_other_nights(manual(51, "If today's statement was true, choose a player to die.")),
        townsfolk("courtier", "Courtier", "Once per game, at night, choose a character: they are drunk for 3 nights & 3 days.")
            .with_first_night(
                at(24, ActionTag::Poison)
                    .with_instruction("Choose a character to make drunk, or shake your head.")
                    .with_handler(handlers::courtier)
                    .requiring(Capability::CourtierDrink),
            )
            .with_other_nights(
                at(13, ActionTag::Poison)
                    .with_instruction("Choose a character to make drunk, or shake your head.")
                    .with_handler(handlers::courtier)
                    .requiring(Capability::CourtierDrink),
            )
            .granting(Capability::CourtierDrink),
        townsfolk("professor", "Professor", "Once per game, at night*, choose a dead player: if they are a Townsfolk, they are resurrected.")
            .with_other_nights(
                at(62, ActionTag::Transform)
                    .with_targets(TargetSpec::exactly(1).dead())
                    .with_instruction("Choose a dead player to resurrect, or shake your head.")
                    .with_handler(handlers::professor)
                    .requiring(Capability::ProfessorRevival),
            )
            .granting(Capability::ProfessorRevival),
        townsfolk("minstrel", "Minstrel", "When a Minion dies by execution, all other players (except Travellers) are drunk until dusk tomorrow."),
        townsfolk("tea_lady", "Tea Lady", "If both your alive neighbours are good, they can't die."),
        townsfolk("pacifist", "Pacifist", "Executed good players might not die."),
        townsfolk("fool", "Fool", "The first time you die, you don't.")
            .granting(Capability::FoolReprieve),
        // Sects & Violets
        townsfolk("clockmaker", "Clockmaker", "You start knowing how many steps from the Demon to its nearest Minion.")
            .with_first_night(info(48, "Show the number of steps from the Demon to its nearest Minion."))
            .with_info(InfoCadence::Once),
        townsfolk("dreamer", "Dreamer", "Each night, choose a player (not yourself or Travellers): you learn 1 good & 1 evil character, 1 of which is correct.")
            .with_first_night(
                at(49, ActionTag::Inspect)
                    .with_targets(one_other())
                    .with_instruction("Choose a player."),
            )
            .with_other_nights(
                at(68, ActionTag::Inspect)
                    .with_targets(one_other())
                    .with_instruction("Choose a player."),
            )
            .with_info(InfoCadence::EveryNight),
        townsfolk("snake_charmer", "Snake Charmer", "Each night, choose an alive player: a chosen Demon swaps characters & alignments with you & is then poisoned.")
            .with_first_night(
                at(26, ActionTag::Transform)
                    .with_targets(one_other())
                    .with_instruction("Choose an alive player.")
                    .with_handler(handlers::snake_charmer),
            )
            .with_other_nights(
                at(17, ActionTag::Transform)
                    .with_targets(one_other())
                    .with_instruction("Choose an alive player.")
                    .with_handler(handlers::snake_charmer),
            ),
        townsfolk("mathematician", "Mathematician", "Each night, you learn how many players' abilities worked abnormally (since dawn) due to another character's ability.")
            .with_first_night(info(65, "Show how many abilities worked abnormally."))
            .with_other_nights(info(84, "Show how many abilities worked abnormally."))
            .with_info(InfoCadence::EveryNight),
        townsfolk("flowergirl", "Flowergirl", "Each night*, you learn if a Demon voted today.")
            .with_other_nights(info(69, "Nod if a Demon voted today."))
            .with_info(InfoCadence::EveryNight),
        townsfolk("town_crier", "Town Crier", "Each night*, you learn if a Minion nominated today.")
            .with_other_nights(info(70, "Nod if a Minion nominated today."))
            .with_info(InfoCadence::EveryNight),
        townsfolk("oracle", "Oracle", "Each night*, you learn how many dead players are evil.")
            .with_other_nights(info(71, "Show how many dead players are evil."))
            .with_info(InfoCadence::EveryNight),
        townsfolk("savant", "Savant", "Each day, you may visit the Storyteller to learn 2 things in private: 1 is true & 1 is false."),
        townsfolk("seamstress", "Seamstress", "Once per game, at night, choose 2 players (not yourself): you learn if they are the same alignment.")
            .with_first_night(
                at(50, ActionTag::Inspect)
                    .with_targets(TargetSpec::exactly(2).not_self().distinct())
                    .with_instruction("Choose 2 players (not yourself), or shake your head.")
                    .with_handler(handlers::seamstress)
                    .requiring(Capability::SeamstressReading),
            )
            .with_other_nights(
                at(72, ActionTag::Inspect)
                    .with_targets(TargetSpec::exactly(2).not_self().distinct())
                    .with_instruction("Choose 2 players (not yourself), or shake your head.")
                    .with_handler(handlers::seamstress)
                    .requiring(Capability::SeamstressReading),
            )
            .with_info(InfoCadence::Once)
            .granting(Capability::SeamstressReading),
        townsfolk("philosopher", "Philosopher", "Once per game, at night, choose a good character: gain that ability. If this character is in play, they are drunk.")
            .with_first_night(
                at(5, ActionTag::Transform)
                    .with_instruction("Choose a good character, or shake your head.")
                    .with_handler(handlers::philosopher)
                    .requiring(Capability::PhilosopherChoice),
            )
            .with_other_nights(
                at(3, ActionTag::Transform)
                    .with_instruction("Choose a good character, or shake your head.")
                    .with_handler(handlers::philosopher)
                    .requiring(Capability::PhilosopherChoice),
            )
            .granting(Capability::PhilosopherChoice),
        townsfolk("artist", "Artist", "Once per game, during the day, privately ask the Storyteller any yes/no question.")
            .granting(Capability::ArtistQuestion),
        townsfolk("juggler", "Juggler", "On your 1st day, publicly guess up to 5 players' characters. That night, you learn how many you got correct.")
            .with_other_nights(info(73, "Show how many guesses were correct."))
            .with_info(InfoCadence::Once),
        townsfolk("sage", "Sage", "If the Demon kills you, you learn that it is 1 of 2 players.")
            .with_other_nights(
                info(57, "You were killed by the Demon. Point to two players.").only_if_died_tonight(),
            )
            .with_info(InfoCadence::Once)
            .waking_when_dead(),
        // Other editions, ordered by the global tables
        townsfolk("poppy_grower", "Poppy Grower", "Minions & Demons do not know each other. If you die, they learn who each other are that night.")
            .with_first_night(info(7, "Minions and Demon do not learn each other."))
            .with_other_nights(info(5, "If the Poppy Grower died today, wake the evil team.")),
        townsfolk("alchemist", "Alchemist", "You have a Minion ability. When using this, the Storyteller may prompt you to choose differently.")
            .with_first_night(info(6, "Show the Minion ability you hold.")),
        townsfolk("amnesiac", "Amnesiac", "You do not know what your ability is. Each day, privately guess what it is: you learn how accurate you are.")
            .with_first_night(manual(4, "Resolve the Amnesiac's hidden ability."))
            .with_other_nights(manual(2, "Resolve the Amnesiac's hidden ability.")),
        townsfolk("magician", "Magician", "The Demon thinks you are a Minion. Minions think you are a Demon.")
            .with_first_night(info(9, "Include the Magician in the evil team's information.")),
        townsfolk("king", "King", "Each night, if the dead equal or outnumber the living, you learn 1 alive character. The Demon knows you are the King.")
            .with_first_night(info(14, "Show the Demon who the King is."))
            .with_other_nights(info(76, "If the dead outnumber the living, show an alive character."))
            .with_info(InfoCadence::EveryNight),
        townsfolk("engineer", "Engineer", "Once per game, at night, choose which Minions or which Demon is in play.")
            .with_first_night(manual(17, "Choose which Demon or Minions are in play, or shake your head.").requiring(Capability::EngineerRebuild))
            .with_other_nights(manual(7, "Choose which Demon or Minions are in play, or shake your head.").requiring(Capability::EngineerRebuild))
            .granting(Capability::EngineerRebuild),
        townsfolk("preacher", "Preacher", "Each night, choose a player: a Minion, if chosen, learns this. All chosen Minions have no ability.")
            .with_first_night(manual(18, "Choose a player.").with_targets(one_alive()))
            .with_other_nights(manual(8, "Choose a player.").with_targets(one_alive())),
        townsfolk("huntsman", "Huntsman", "Once per game, at night, choose a living player: the Damsel, if chosen, becomes a not-in-play Townsfolk.")
            .with_first_night(manual(39, "Choose a living player, or shake your head.").with_targets(one_alive()).requiring(Capability::HuntsmanGuess))
            .with_other_nights(manual(63, "Choose a living player, or shake your head.").with_targets(one_alive()).requiring(Capability::HuntsmanGuess))
            .granting(Capability::HuntsmanGuess),
        townsfolk("pixie", "Pixie", "You start knowing 1 in-play Townsfolk. If you were mad that you were this character, you gain their ability when they die.")
            .with_first_night(info(38, "Show an in-play Townsfolk."))
            .with_info(InfoCadence::Once),
        townsfolk("steward", "Steward", "You start knowing 1 good player.")
            .with_first_night(info(51, "Point to a good player."))
            .with_info(InfoCadence::Once),
        townsfolk("knight", "Knight", "You start knowing 2 players that are not the Demon.")
            .with_first_night(info(52, "Point to two players who are not the Demon."))
            .with_info(InfoCadence::Once),
        townsfolk("noble", "Noble", "You start knowing 3 players, 1 and only 1 of which is evil.")
            .with_first_night(info(53, "Point to three players, exactly one of them evil."))
            .with_info(InfoCadence::Once),
        townsfolk("balloonist", "Balloonist", "Each night, you learn a player of a different character type than last night.")
            .with_first_night(info(54, "Point to a player."))
            .with_other_nights(info(74, "Point to a player of a different type than last night."))
            .with_info(InfoCadence::EveryNight),
        townsfolk("village_idiot", "Village Idiot", "Each night, choose a player: you learn their alignment.")
            .with_first_night(at(55, ActionTag::Inspect).with_targets(one_other()).with_instruction("Choose a player."))
            .with_other_nights(at(75, ActionTag::Inspect).with_targets(one_other()).with_instruction("Choose a player."))
            .with_info(InfoCadence::EveryNight),
        townsfolk("bounty_hunter", "Bounty Hunter", "You start knowing 1 evil player. If the player you know dies, you learn another evil player tonight.")
            .with_first_night(info(56, "Point to an evil player."))
            .with_other_nights(info(77, "If your evil player died, point to another."))
            .with_info(InfoCadence::Once),
        townsfolk("nightwatchman", "Nightwatchman", "Once per game, at night, choose a player: they learn you are the Nightwatchman.")
            .with_first_night(manual(57, "Choose a player, or shake your head.").with_targets(one_other()).requiring(Capability::NightwatchmanReveal))
            .with_other_nights(manual(78, "Choose a player, or shake your head.").with_targets(one_other()).requiring(Capability::NightwatchmanReveal))
            .granting(Capability::NightwatchmanReveal),
        townsfolk("cult_leader", "Cult Leader", "Each night, you become the alignment of an alive neighbour.")
            .with_first_night(info(58, "Show your alignment."))
            .with_other_nights(info(79, "Show your alignment.")),
        townsfolk("priestess", "Priestess", "Each night, learn a player the Storyteller believes you should talk to most.")
            .with_first_night(info(61, "Point to a player."))
            .with_other_nights(info(81, "Point to a player."))
            .with_info(InfoCadence::EveryNight),
        townsfolk("shugenja", "Shugenja", "You start knowing if your closest evil player is clockwise or anti-clockwise.")
            .with_first_night(info(62, "Point clockwise or anti-clockwise."))
            .with_info(InfoCadence::Once),
        townsfolk("general", "General", "Each night, you learn which alignment the Storyteller believes is winning.")
            .with_first_night(info(63, "Show good, evil or neither."))
            .with_other_nights(info(82, "Show good, evil or neither."))
            .with_info(InfoCadence::EveryNight),
        townsfolk("acrobat", "Acrobat", "Each night*, choose a player: if they are or become drunk or poisoned tonight, you die.")
            .with_other_nights(manual(16, "Choose a player.").with_targets(one_other())),
        townsfolk("lycanthrope", "Lycanthrope", "Each night*, choose an alive player. If good, they die, but they are the only player that can die tonight.")
            .with_other_nights(manual(30, "Choose an alive player.").with_targets(one_other())),
        townsfolk("princess", "Princess", "On your 1st day, if you nominated & executed a player, the Demon doesn't kill tonight.")
            .with_other_nights(manual(31, "If the Princess's nominee was executed, the Demon does not kill tonight.")),
        townsfolk("choirboy", "Choirboy", "If the Demon kills the King, you learn which player is the Demon.")
            .with_other_nights(info(59, "If the King was killed by the Demon, point to the Demon."))
            .with_info(InfoCadence::Once),
        townsfolk("farmer", "Farmer", "When you die at night, an alive good player becomes a Farmer.")
            .with_other_nights(manual(60, "Turn an alive good player into a Farmer.").only_if_died_tonight())
            .waking_when_dead(),
        townsfolk("banshee", "Banshee", "If the Demon kills you, all players learn this. From now on, you may nominate twice per day and vote twice per nomination.")
            .with_other_nights(manual(61, "Announce the Banshee's death tomorrow.").only_if_died_tonight())
            .waking_when_dead(),
    ]
}
