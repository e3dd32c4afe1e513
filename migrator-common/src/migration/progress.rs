use std::io::{self, Write};

use crate::config::MigrationOptions;

/// 每行的进度点数量
const DOTS_PER_ROW: u64 = 50;

/// 轻量级进度指示：每处理 `interval` 个键输出一个点，每 50 个点换行
pub struct Progress {
    enabled: bool,
    interval: u64,
    pending: u64,
    dots: u64,
    out: Box<dyn Write>,
}

impl Progress {
    pub fn new(options: &MigrationOptions) -> Self {
        Self::with_writer(options, Box::new(io::stderr()))
    }

    pub fn with_writer(options: &MigrationOptions, out: Box<dyn Write>) -> Self {
        Self {
            enabled: options.show_progress,
            interval: options.progress_interval.max(1),
            pending: 0,
            dots: 0,
            out,
        }
    }

    /// 每行代表的键数量
    pub fn keys_per_row(&self) -> u64 {
        self.interval * DOTS_PER_ROW
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn dots(&self) -> u64 {
        self.dots
    }

    pub fn advance(&mut self, keys: u64) {
        if !self.enabled {
            return;
        }
        self.pending += keys;
        while self.pending >= self.interval {
            self.pending -= self.interval;
            self.dots += 1;
            // 进度输出失败不影响迁移
            let _ = self.out.write_all(b".");
            if self.dots % DOTS_PER_ROW == 0 {
                let _ = self.out.write_all(b"\n");
            }
        }
        let _ = self.out.flush();
    }

    pub fn finish(&mut self) {
        if self.enabled && self.dots % DOTS_PER_ROW != 0 {
            let _ = self.out.write_all(b"\n");
            let _ = self.out.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn prints_a_dot_per_interval_and_wraps_rows() {
        let options = MigrationOptions {
            progress_interval: 10,
            ..MigrationOptions::default()
        };
        let buffer = SharedBuffer::default();
        let mut progress = Progress::with_writer(&options, Box::new(buffer.clone()));

        progress.advance(5);
        assert_eq!(progress.dots(), 0);
        progress.advance(505);
        assert_eq!(progress.dots(), 51);
        progress.finish();

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output, format!("{}\n.\n", ".".repeat(50)));
        assert_eq!(progress.keys_per_row(), 500);
    }

    #[test]
    fn disabled_progress_is_silent() {
        let options = MigrationOptions {
            show_progress: false,
            progress_interval: 1,
            ..MigrationOptions::default()
        };
        let buffer = SharedBuffer::default();
        let mut progress = Progress::with_writer(&options, Box::new(buffer.clone()));
        progress.advance(100);
        progress.finish();
        assert!(buffer.0.lock().unwrap().is_empty());
    }
}
