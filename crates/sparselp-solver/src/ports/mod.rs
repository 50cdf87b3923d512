mod microlp_port;
mod recording;

pub use microlp_port::MicrolpPort;
pub use recording::{PortCall, RecordingPort};

/// Slot for a 1-based index, `None` for 0 or past the end
fn one_based<T>(items: &mut [T], index: usize) -> Option<&mut T> {
    index.checked_sub(1).and_then(|k| items.get_mut(k))
}
