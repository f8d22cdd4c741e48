pub(crate) const DEFAULT_THREAD_COUNT: u8 = 2;
