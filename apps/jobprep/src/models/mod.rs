pub mod interaction;
pub mod posting;
pub mod recommendation;
pub mod salary;
