use chrono::{DateTime, Utc};

/// One RGBA still pulled from the live source.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA, `width * height * 4` bytes.
    pub data: Vec<u8>,
    pub captured_at: DateTime<Utc>,
}

impl VideoFrame {
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
            captured_at: Utc::now(),
        }
    }

    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
            captured_at: Utc::now(),
        }
    }

    /// Uniformly coloured frame, mostly useful for tests and placeholders.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        Self::from_rgba(width, height, data)
    }

    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 4
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGB of the pixel at (x, y), or `None` outside the frame.
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(index..index + 3)?;
        Some((px[0], px[1], px[2]))
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data.resize(Self::byte_len(width, height), 0);
    }
}

/// Two reusable frame slots: the one just captured and the one before it.
///
/// Each capture writes into the slot that is not current and then flips the
/// index, so the old current frame becomes the previous one without copying.
#[derive(Debug)]
pub struct FrameArena {
    slots: [VideoFrame; 2],
    current: usize,
    filled: usize,
}

impl FrameArena {
    pub fn new() -> Self {
        Self {
            slots: [VideoFrame::empty(), VideoFrame::empty()],
            current: 0,
            filled: 0,
        }
    }

    /// Slot the next capture should draw into, already sized to `width x height`.
    pub fn next_slot(&mut self, width: u32, height: u32) -> &mut VideoFrame {
        let next = 1 - self.current;
        let slot = &mut self.slots[next];
        slot.resize(width, height);
        slot
    }

    /// Publish the slot handed out by `next_slot` as the current frame.
    pub fn commit(&mut self) {
        self.current = 1 - self.current;
        self.slots[self.current].captured_at = Utc::now();
        self.filled = (self.filled + 1).min(2);
    }

    pub fn current(&self) -> Option<&VideoFrame> {
        (self.filled > 0).then(|| &self.slots[self.current])
    }

    /// The frame captured before the current one, if it can be compared with it.
    pub fn previous(&self) -> Option<&VideoFrame> {
        if self.filled < 2 {
            return None;
        }
        let current = &self.slots[self.current];
        let previous = &self.slots[1 - self.current];
        (previous.width == current.width && previous.height == current.height).then_some(previous)
    }

    pub fn clear(&mut self) {
        self.slots = [VideoFrame::empty(), VideoFrame::empty()];
        self.current = 0;
        self.filled = 0;
    }
}

impl Default for FrameArena {
    fn default() -> Self {
        Self::new()
    }
}
