use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent};

use datagrid::DataGridError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Quit,
    CopySelection,
    FontBigger,
    FontSmaller,
    ToggleHeader,
    CyclePolicy,
    Regenerate,
    Table(KeyEvent),
    Pointer(MouseEvent),
    Resize,
}

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(event_poll_time: u64) -> Self {
        Self { event_poll_time }
    }

    pub fn handle_event(&self) -> Result<Option<Message>, DataGridError> {
        if !event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(None);
        }
        let message = match event::read()? {
            Event::Key(key) if key.kind == event::KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => Some(Message::Pointer(mouse)),
            Event::Resize(_, _) => Some(Message::Resize),
            _ => None,
        };
        Ok(message)
    }

    pub fn handle_key(&self, key: KeyEvent) -> Option<Message> {
        let message = match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) => Some(Message::Quit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Char('y'), _) => Some(Message::CopySelection),
            (KeyCode::Char('+'), _) => Some(Message::FontBigger),
            (KeyCode::Char('-'), _) => Some(Message::FontSmaller),
            (KeyCode::Char('h'), _) => Some(Message::ToggleHeader),
            (KeyCode::Char('p'), _) => Some(Message::CyclePolicy),
            (KeyCode::Char('r'), _) => Some(Message::Regenerate),
            _ => Some(Message::Table(key)),
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_messages() {
        let controller = Controller::new(100);
        let press = |code, modifiers| controller.handle_key(KeyEvent::new(code, modifiers));
        assert_eq!(press(KeyCode::Char('q'), KeyModifiers::NONE), Some(Message::Quit));
        assert_eq!(press(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(Message::Quit));
        assert_eq!(press(KeyCode::Char('y'), KeyModifiers::NONE), Some(Message::CopySelection));
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT);
        assert_eq!(press(KeyCode::Down, KeyModifiers::SHIFT), Some(Message::Table(down)));
    }
}
