//! Logging shorthands over the global [`Logger`](crate::domain::logging::Logger).
//! Each expands to a block, so it works as a statement or as a match arm.
//! Debug and info lines are compiled out of release builds.

#[macro_export]
macro_rules! log_debug {
    ($component:expr, $($arg:tt)*) => {
        {
            #[cfg(debug_assertions)]
            $crate::domain::logging::Logger::debug(
                $crate::domain::logging::get_logger(),
                $component,
                &format!($($arg)*),
            );
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($component:expr, $($arg:tt)*) => {
        {
            #[cfg(debug_assertions)]
            $crate::domain::logging::Logger::info(
                $crate::domain::logging::get_logger(),
                $component,
                &format!($($arg)*),
            );
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($component:expr, $($arg:tt)*) => {
        {
            $crate::domain::logging::Logger::warn(
                $crate::domain::logging::get_logger(),
                $component,
                &format!($($arg)*),
            );
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($component:expr, $($arg:tt)*) => {
        {
            $crate::domain::logging::Logger::error(
                $crate::domain::logging::get_logger(),
                $component,
                &format!($($arg)*),
            );
        }
    };
}
