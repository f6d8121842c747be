use minifb::{Key, KeyRepeat, Window, WindowOptions};

/// User commands read from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    TriggerSearch,
    ToggleOverlay,
}

pub fn command_for(key: Key) -> Option<KeyCommand> {
    match key {
        Key::Q | Key::Escape => Some(KeyCommand::Quit),
        Key::R => Some(KeyCommand::TriggerSearch),
        Key::H => Some(KeyCommand::ToggleOverlay),
        _ => None,
    }
}

/// Packs RGB bytes into minifb's `0RGB` words.
pub fn pack_rgb(rgb: &[u8], out: &mut Vec<u32>) {
    out.clear();
    out.extend(
        rgb.chunks_exact(3)
            .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2])),
    );
}

/// Native window showing the annotated camera feed.
pub struct DisplayWindow {
    window: Window,
    buffer: Vec<u32>,
}

impl DisplayWindow {
    pub fn open(title: &str, width: u32, height: u32) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            title,
            width as usize,
            height as usize,
            WindowOptions::default(),
        )?;
        window.set_target_fps(60);
        log::info!("Opened {width}x{height} display window");
        Ok(Self {
            window,
            buffer: Vec::with_capacity(width as usize * height as usize),
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Presents one RGB frame of `width` x `height` pixels.
    pub fn show(&mut self, rgb: &[u8], width: u32, height: u32) -> Result<(), minifb::Error> {
        pack_rgb(rgb, &mut self.buffer);
        self.window
            .update_with_buffer(&self.buffer, width as usize, height as usize)
    }

    /// Commands for keys pressed since the last update.
    pub fn commands(&self) -> Vec<KeyCommand> {
        self.window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(command_for)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(command_for(Key::Q), Some(KeyCommand::Quit));
        assert_eq!(command_for(Key::Escape), Some(KeyCommand::Quit));
        assert_eq!(command_for(Key::R), Some(KeyCommand::TriggerSearch));
        assert_eq!(command_for(Key::H), Some(KeyCommand::ToggleOverlay));
        assert_eq!(command_for(Key::Space), None);
    }

    #[test]
    fn test_pack_rgb() {
        let mut out = vec![7];
        pack_rgb(&[0xFF, 0x00, 0x80, 0x01, 0x02, 0x03], &mut out);
        assert_eq!(out, vec![0x00FF_0080, 0x0001_0203]);
    }
}
