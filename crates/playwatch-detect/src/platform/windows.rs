use tracing::debug;

use windows::core::PCWSTR;
use windows::Win32::Foundation::ERROR_SUCCESS;
use windows::Win32::System::Registry::*;

/// Read a value under `HKEY_CURRENT_USER\<location>`.
///
/// DWORD values are rendered as decimal; string values are returned as-is.
/// Any other type is treated as absent.
pub fn read_current_user(location: &str, key: &str) -> Option<String> {
    let subkey = to_wide(location);
    let value_name = to_wide(key);
    let mut hkey = HKEY::default();

    unsafe {
        let status = RegOpenKeyExW(
            HKEY_CURRENT_USER,
            PCWSTR(subkey.as_ptr()),
            0,
            KEY_READ,
            &mut hkey,
        );
        if status != ERROR_SUCCESS {
            debug!(location, "Registry key not found");
            return None;
        }

        let value = query_value(hkey, &value_name);
        let _ = RegCloseKey(hkey);
        value
    }
}

unsafe fn query_value(hkey: HKEY, value_name: &[u16]) -> Option<String> {
    let mut kind = REG_VALUE_TYPE::default();
    let mut size = 0u32;
    let status = RegQueryValueExW(
        hkey,
        PCWSTR(value_name.as_ptr()),
        None,
        Some(&mut kind),
        None,
        Some(&mut size),
    );
    if status != ERROR_SUCCESS {
        return None;
    }

    let mut data = vec![0u8; size as usize];
    let status = RegQueryValueExW(
        hkey,
        PCWSTR(value_name.as_ptr()),
        None,
        Some(&mut kind),
        Some(data.as_mut_ptr()),
        Some(&mut size),
    );
    if status != ERROR_SUCCESS {
        return None;
    }
    data.truncate(size as usize);

    match kind {
        REG_DWORD if data.len() >= 4 => {
            Some(u32::from_le_bytes([data[0], data[1], data[2], data[3]]).to_string())
        }
        REG_SZ | REG_EXPAND_SZ => {
            let wide: Vec<u16> = data
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .take_while(|&c| c != 0)
                .collect();
            Some(String::from_utf16_lossy(&wide))
        }
        _ => None,
    }
}

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
