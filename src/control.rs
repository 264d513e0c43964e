use std::sync::mpsc::{Receiver, Sender, channel};

/// Commands the input layer may send to a running driver.
///
/// Physical parameters are immutable for the session, so there is
/// deliberately no command that edits them; only the run/pause state and
/// the phase state itself can be touched.
#[derive(Debug, Clone)]
pub enum SimCommand {
    Pause,
    Resume,
    Toggle,
    Step(u32),
    Reset,
}

pub struct CommandQueue {
    receiver: Receiver<SimCommand>,
}

pub struct CommandSender {
    sender: Sender<SimCommand>,
}

impl CommandQueue {
    pub fn new() -> (Self, CommandSender) {
        let (sender, receiver) = channel();
        (Self { receiver }, CommandSender { sender })
    }

    pub fn try_recv(&self) -> Option<SimCommand> {
        self.receiver.try_recv().ok()
    }
}

impl CommandSender {
    pub fn send(&self, cmd: SimCommand) {
        let _ = self.sender.send(cmd);
    }
}
