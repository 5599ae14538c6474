mod client;

pub use client::NexTripClient;
