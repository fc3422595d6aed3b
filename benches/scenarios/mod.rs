mod control;
mod voice;

pub use control::bench_control;
pub use voice::bench_voice;
