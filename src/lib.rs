// Reward Hook - Episode telemetry for a driving agent
//
// Layers:
//   core   - shared types, events, errors, clock, config, logging
//   layer1 - environment read boundary
//   layer2 - aggregators, rolling history, episodes
//   layer3 - trackers and the episode driver
//   server - HTTP exposition of closed episodes

pub mod core;
pub mod layer1;
pub mod layer2;
pub mod layer3;
pub mod server;
