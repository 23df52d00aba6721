//! OpenAPI Specification for the Corkboard API
//!
//! Generates the OpenAPI document from Rust types and route annotations via
//! utoipa.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::SESSION_COOKIE;
use crate::error::{ApiError, ErrorCode};
use crate::routes::{board, card, column, health};
use crate::types::{
    BoardDetailResponse, ColumnDetail, ColumnOrder, CreateBoardRequest, CreateCardRequest,
    CreateColumnRequest, InviteMemberRequest, ListBoardsResponse, ListCardsResponse,
    ListColumnsResponse, MoveCardRequest, MoveColumnRequest, ReorderColumnsRequest,
    UpdateBoardRequest, UpdateCardRequest, UpdateColumnRequest,
};

use corkboard_core::{Board, BoardMember, BoardRole, Card, Column};

/// OpenAPI document for the Corkboard API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Corkboard API",
        version = "0.3.0",
        description = "Kanban board backend with dense positional ordering of columns and cards",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Boards", description = "Board management and membership"),
        (name = "Columns", description = "Ordered columns of a board, with reorder and move operations"),
        (name = "Cards", description = "Ordered cards of a column, with the move operation"),
        (name = "Health", description = "Liveness and readiness checks")
    ),
    paths(
        // === Board Routes ===
        board::create_board,
        board::list_boards,
        board::get_board,
        board::update_board,
        board::delete_board,
        board::invite_member,

        // === Column Routes ===
        column::create_column,
        column::list_columns,
        column::get_column,
        column::update_column,
        column::delete_column,
        column::reorder_columns,
        column::move_column,

        // === Card Routes ===
        card::create_card,
        card::list_cards,
        card::get_card,
        card::update_card,
        card::delete_card,
        card::move_card,
        card::search_cards,

        // === Health Routes ===
        health::ping,
        health::liveness,
        health::readiness,
    ),
    components(
        schemas(
            // Core entities
            Board,
            BoardMember,
            BoardRole,
            Column,
            Card,

            // Requests and responses
            CreateBoardRequest,
            UpdateBoardRequest,
            InviteMemberRequest,
            ListBoardsResponse,
            BoardDetailResponse,
            ColumnDetail,
            CreateColumnRequest,
            UpdateColumnRequest,
            ListColumnsResponse,
            ColumnOrder,
            ReorderColumnsRequest,
            MoveColumnRequest,
            CreateCardRequest,
            UpdateCardRequest,
            ListCardsResponse,
            MoveCardRequest,

            // Errors
            ApiError,
            ErrorCode,

            // Health
            health::HealthResponse,
            health::HealthStatus,
            health::HealthDetails,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Adds the session-cookie security scheme to the generated document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            );
        }
    }
}
