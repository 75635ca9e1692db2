// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing message catalogue (Korean).
//
// Every outcome the page or a native dialog can show is assembled here so
// the wording lives in one place.

use crate::types::ShareTarget;

// -- Share -------------------------------------------------------------------

pub fn share_success(target: ShareTarget) -> String {
    format!("{}(으)로 공유했어요.", target.display_name())
}

pub fn share_cancelled() -> String {
    "공유를 취소했어요.".to_owned()
}

pub fn share_failed(detail: &str) -> String {
    format!("공유에 실패했어요. ({detail})")
}

// -- Image download ----------------------------------------------------------

pub fn download_invalid_url() -> String {
    "이미지 주소가 올바르지 않아요.".to_owned()
}

pub fn download_failed(detail: &str) -> String {
    format!("이미지를 내려받지 못했어요. ({detail})")
}

pub fn download_invalid_format() -> String {
    "이미지 형식이 올바르지 않아요.".to_owned()
}

pub fn download_saved() -> String {
    "이미지를 앨범에 저장했어요.".to_owned()
}

pub fn download_save_failed() -> String {
    "이미지를 저장하지 못했어요. 잠시 후 다시 시도해 주세요.".to_owned()
}

pub fn download_permission_required() -> String {
    "사진 접근 권한이 필요해요. 설정에서 사진 접근을 허용해 주세요.".to_owned()
}

pub fn download_permission_undetermined() -> String {
    "사진 접근 권한이 아직 설정되지 않았어요. 다시 시도해 주세요.".to_owned()
}

pub fn download_permission_unknown(status: i32) -> String {
    format!("사진 접근 권한 상태를 확인할 수 없어요. (status {status})")
}

// -- Developer mode ----------------------------------------------------------

pub fn devmode_wrong_password() -> String {
    "비밀번호가 올바르지 않아요.".to_owned()
}

pub fn devmode_prompt_title() -> String {
    "개발자 모드".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_success_names_the_target() {
        assert!(share_success(ShareTarget::Mail).contains("메일"));
        assert!(share_success(ShareTarget::Unknown).contains("알 수 없는 앱"));
    }

    #[test]
    fn unknown_permission_status_is_included() {
        assert!(download_permission_unknown(7).contains("status 7"));
    }
}
