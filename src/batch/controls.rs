use std::sync::atomic::{AtomicBool, Ordering};

/// 一括操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchControl {
    CompressAll,
    ExportAll,
}

/// 一括操作ボタンの利用可否
#[derive(Debug, Default)]
pub struct BatchControls {
    compress_all_busy: AtomicBool,
    export_all_busy: AtomicBool,
}

impl BatchControls {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self, control: BatchControl) -> &AtomicBool {
        match control {
            BatchControl::CompressAll => &self.compress_all_busy,
            BatchControl::ExportAll => &self.export_all_busy,
        }
    }

    /// 操作を開始する。実行中なら`None`
    pub fn acquire(&self, control: BatchControl) -> Option<ControlGuard<'_>> {
        self.flag(control)
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ControlGuard {
                flag: self.flag(control),
            })
    }

    pub fn is_available(&self, control: BatchControl) -> bool {
        !self.flag(control).load(Ordering::Acquire)
    }
}

/// ドロップ時に操作を再び利用可能にする
#[derive(Debug)]
pub struct ControlGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ControlGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
