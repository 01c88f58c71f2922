pub mod gig;

pub use gig::{Gig, Venue};
