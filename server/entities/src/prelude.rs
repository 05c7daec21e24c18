pub use super::game::Entity as Game;
pub use super::guess::Entity as Guess;
pub use super::participant::Entity as Participant;
pub use super::pool::Entity as Pool;
pub use super::user::Entity as User;
