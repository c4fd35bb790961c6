use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    catalog::SortKey,
    coupons::{AppliedCoupon, Coupon, CouponType},
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartItemDto, CartList},
        coupons::{ApplyCouponRequest, CouponList},
        orders::{CheckoutRequest, OrderList, OrderWithItems},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        search::{PriceRange, SearchResponse},
    },
    models::{CartItem, Order, OrderItem, Product, User},
    response::{ApiResponse, Meta},
    routes::{auth, cart, coupons, health, orders, params, products, search},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        search::search_products,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        coupons::list_coupons,
        coupons::apply_coupon,
        auth::register,
        auth::login,
        auth::me,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order
    ),
    components(
        schemas(
            User,
            Product,
            CartItem,
            Order,
            OrderItem,
            Coupon,
            CouponType,
            AppliedCoupon,
            SortKey,
            PriceRange,
            SearchResponse,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            AddToCartRequest,
            CartItemDto,
            CartList,
            ApplyCouponRequest,
            CouponList,
            CheckoutRequest,
            OrderList,
            OrderWithItems,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<AppliedCoupon>,
            ApiResponse<CouponList>,
            ApiResponse<CartList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Search", description = "Free-text catalog search"),
        (name = "Products", description = "Product endpoints"),
        (name = "Coupons", description = "Coupon listing and preview"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
