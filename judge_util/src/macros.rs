#[macro_export]
macro_rules! opt {
    (, $default:ident) => {
        $default
    };
    ($value:expr, $default:ident) => {
        $value
    };
}

#[macro_export]
macro_rules! params_internal {
    ($vec:ident, required, $key:expr, $val:expr) => {
        $vec.push(($key, $val.to_string()));
    };
    ($vec:ident, optional, $key:expr, $val:expr) => {
        if let Some(ref v) = $val {
            $vec.push(($key, v.to_string()));
        }
    };
}

/// Build the query parameters of a request as `Vec<(String, String)>`.
/// A parameter is either `required` (always present) or `optional` (skipped when `None`),
/// and its value defaults to the variable of the same name.
/// ```ignore
/// let params = build_params! {
///     required count => 200,
///     optional max_id,
/// };
/// ```
#[macro_export]
macro_rules! build_params {
    (
        $(
            $kind:ident $name:ident $( => $val:expr )?
        ),+ $(,)?
    ) => {
        {
            let mut params: Vec<(String, String)> = Vec::new();
            $(
                $crate::params_internal!(
                    params,
                    $kind,
                    stringify!($name).to_string(),
                    $crate::opt!($( $val )?, $name)
                );
            )+
            params
        }
    };
}
